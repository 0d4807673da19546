//! The index page: a tag bar, a search box, and a grid of post cards.
//!
//! Interaction is an explicit stream of [`Event`]s. [`Filter::apply`] is a
//! pure function from an event and the current filter state to the next state
//! and a [`Render`] instruction; [`IndexView`] owns the state for the lifetime
//! of the page and performs the instructed re-render into the [`Document`].

use crate::config::Features;
use crate::dom::Document;
use crate::markup::{escape_html, Markup};
use crate::post::Post;
use crate::search::{filter_posts, unique_tags, ActiveTag, Filter};

pub const TAG_BAR: &str = "tagbar";
pub const POST_GRID: &str = "postGrid";
pub const SEARCH_INPUT: &str = "searchInput";

/// A reader interaction on the index page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A tag-bar control was clicked. Carries the control's `data-tag`, or
    /// `None` when the click landed on the bar outside any control.
    TagClicked(Option<String>),

    /// The search box's text changed.
    SearchInput(String),

    /// A key was pressed anywhere on the page.
    KeyDown { key: String, ctrl: bool, meta: bool },
}

/// What to redraw after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Render {
    Nothing,

    /// Re-filter and redraw the grid.
    Grid,

    /// Redraw the tag bar's active marker, then the grid.
    TagBarAndGrid,

    /// Move focus to the search box.
    FocusSearch,
}

impl Filter {
    /// Computes the state following `event`. `search_shortcut` enables the
    /// Ctrl/Cmd+K focus shortcut.
    pub fn apply(&self, event: &Event, search_shortcut: bool) -> (Filter, Render) {
        match event {
            Event::TagClicked(None) => (self.clone(), Render::Nothing),
            Event::TagClicked(Some(data_tag)) => (
                Filter {
                    tag: ActiveTag::from_data_tag(data_tag),
                    query: self.query.clone(),
                },
                Render::TagBarAndGrid,
            ),
            Event::SearchInput(query) => (
                Filter {
                    tag: self.tag.clone(),
                    query: query.clone(),
                },
                Render::Grid,
            ),
            Event::KeyDown { key, ctrl, meta }
                if search_shortcut
                    && (*ctrl || *meta)
                    && key.to_lowercase() == "k" =>
            {
                (self.clone(), Render::FocusSearch)
            }
            Event::KeyDown { .. } => (self.clone(), Render::Nothing),
        }
    }
}

/// Owns the index page's filter state and renders it.
pub struct IndexView<'a> {
    posts: &'a [Post],
    tags: Vec<String>,
    filter: Filter,
    features: Features,
}

impl<'a> IndexView<'a> {
    /// Activates the view: renders the tag bar and the unfiltered grid.
    pub fn init(posts: &'a [Post], features: Features, doc: &mut Document) -> IndexView<'a> {
        let view = IndexView {
            posts,
            tags: unique_tags(posts),
            filter: Filter::default(),
            features,
        };
        view.render_tag_bar(doc);
        view.render_grid(doc);
        view
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Handles one event and performs the resulting render.
    pub fn dispatch(&mut self, event: &Event, doc: &mut Document) -> Render {
        let (filter, render) = self.filter.apply(event, self.features.search_shortcut);
        self.filter = filter;
        log::debug!("index event {:?} -> {:?}", event, render);
        match render {
            Render::Nothing => {}
            Render::Grid => self.render_grid(doc),
            Render::TagBarAndGrid => {
                self.render_tag_bar(doc);
                self.render_grid(doc);
            }
            Render::FocusSearch => {
                if doc.has(SEARCH_INPUT) {
                    doc.focused = Some(SEARCH_INPUT.to_owned());
                }
            }
        }
        render
    }

    fn render_tag_bar(&self, doc: &mut Document) {
        let bar = match doc.element_mut(TAG_BAR) {
            Some(bar) => bar,
            None => return,
        };
        let mut html = String::new();
        push_tag_button(&mut html, &ActiveTag::All, "All", &self.filter.tag);
        for tag in &self.tags {
            let choice = ActiveTag::Tag(tag.clone());
            push_tag_button(&mut html, &choice, tag, &self.filter.tag);
        }
        bar.html = Markup::trusted(html);
    }

    fn render_grid(&self, doc: &mut Document) {
        if let Some(input) = doc.element_mut(SEARCH_INPUT) {
            input.value = Some(Markup::escape(&self.filter.query));
        }
        let grid = match doc.element_mut(POST_GRID) {
            Some(grid) => grid,
            None => return,
        };
        let posts = filter_posts(self.posts, &self.filter);
        grid.html = if posts.is_empty() && self.features.no_results_message {
            message_card(
                "No posts found",
                &Markup::escape("Try clearing your search or switching tags."),
            )
        } else {
            render_cards(&posts, self.features.header_images)
        };
    }
}

fn push_tag_button(html: &mut String, choice: &ActiveTag, text: &str, active: &ActiveTag) {
    let class = match choice == active {
        true => "tag active",
        false => "tag",
    };
    html.push_str(&format!(
        r#"<button class="{}" type="button" data-tag="{}">{}</button>"#,
        class,
        escape_html(choice.data_tag()),
        escape_html(text),
    ));
}

/// Renders the post cards for the grid.
pub fn render_cards(posts: &[&Post], header_images: bool) -> Markup {
    let mut html = String::new();
    for post in posts {
        let media_style = match (post.header_image(), header_images) {
            (Some(image), true) => format!(
                r#" style="background-image:url('{}')""#,
                escape_html(image)
            ),
            _ => String::new(),
        };
        html.push_str(&format!(
            r#"
      <a class="glass-card" href="{}">
        <div class="card-media"{}></div>
        <div class="blog-card-content">
          <div class="blog-card-date">{}</div>
          <h2>{}</h2>
          <p class="blog-card-excerpt">{}</p>
          <span class="read-more">Read <span>→</span></span>
        </div>
      </a>
    "#,
            escape_html(&post.url()),
            media_style,
            escape_html(post.display_date()),
            escape_html(&post.title),
            escape_html(post.excerpt()),
        ));
    }
    Markup::trusted(html)
}

/// Renders a card carrying a heading and a short explanation, used in place of
/// the grid when there is nothing to show.
pub fn message_card(heading: &str, body: &Markup) -> Markup {
    Markup::trusted(format!(
        r#"
      <div class="glass-card" style="padding:18px">
        <div class="blog-card-content" style="padding:0">
          <h2 style="margin:0 0 8px;">{}</h2>
          <p class="blog-card-excerpt" style="margin:0;">{}</p>
        </div>
      </div>
    "#,
        escape_html(heading),
        body
    ))
}
