//! The post page. [`render_post`] resolves the post addressed by the current
//! location, fills in its metadata, injects its fragment, and cross-links it
//! with its neighbours and related posts.

use crate::clipboard::{Clipboard, CopyLink};
use crate::config::Features;
use crate::dom::Document;
use crate::fetch::{Error as FetchError, Fetch};
use crate::markup::{escape_html, Markup};
use crate::post::Post;
use std::collections::HashSet;
use std::fmt;
use std::time::Instant;
use url::Url;

pub const POST_TITLE: &str = "postTitle";
pub const POST_DATE: &str = "postDate";
pub const POST_EXCERPT: &str = "postExcerpt";
pub const POST_HERO: &str = "postHero";
pub const POST_TAGS: &str = "postTags";
pub const POST_BODY: &str = "postBody";
pub const POST_READ_TIME: &str = "postReadTime";
pub const COPY_LINK: &str = "copyLink";
pub const PREV_POST: &str = "prevPost";
pub const NEXT_POST: &str = "nextPost";
pub const RELATED: &str = "related";

/// Reading speed used for reading-time estimates.
pub const WORDS_PER_MINUTE: usize = 220;

/// The number of related posts shown.
pub const RELATED_LIMIT: usize = 3;

/// Formats the estimated reading time of `text`. Never less than one minute.
pub fn estimate_reading_time(text: &str) -> String {
    let words = text.split_whitespace().count();
    let minutes = ((words as f64 / WORDS_PER_MINUTE as f64).round() as usize).max(1);
    format!("{} min read", minutes)
}

/// Returns the value of the `slug` query parameter, if any.
pub fn slug_param(location: &Url) -> Option<String> {
    location
        .query_pairs()
        .find(|(key, _)| key == "slug")
        .map(|(_, value)| value.into_owned())
}

/// Resolves the post to display: the first post whose slug matches, or the
/// first (newest) post when there is no match. `None` only for an empty
/// collection.
pub fn resolve_post<'a>(posts: &'a [Post], slug: Option<&str>) -> Option<(usize, &'a Post)> {
    slug.and_then(|slug| posts.iter().enumerate().find(|(_, p)| p.slug == slug))
        .or_else(|| posts.first().map(|p| (0, p)))
}

/// The older and newer neighbours of the post at `idx` in a newest-first
/// collection.
pub struct Neighbours<'a> {
    /// The next older post (`idx + 1`).
    pub previous: Option<&'a Post>,

    /// The next newer post (`idx - 1`).
    pub next: Option<&'a Post>,
}

pub fn neighbours(posts: &[Post], idx: usize) -> Neighbours {
    Neighbours {
        previous: posts.get(idx + 1),
        next: match idx {
            0 => None,
            _ => posts.get(idx - 1),
        },
    }
}

/// Returns up to [`RELATED_LIMIT`] posts sharing tags with `post`, most shared
/// tags first and newer posts first among equals. The post itself and posts
/// sharing no tags are excluded.
pub fn related_posts<'a>(posts: &'a [Post], post: &Post) -> Vec<&'a Post> {
    let tags: HashSet<&str> = post.tags.iter().map(String::as_str).collect();
    let mut scored: Vec<(usize, &Post)> = posts
        .iter()
        .filter(|p| p.slug != post.slug)
        .map(|p| {
            let score = p.tags.iter().filter(|t| tags.contains(t.as_str())).count();
            (score, p)
        })
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|(a_score, a), (b_score, b)| {
        b_score.cmp(a_score).then_with(|| b.date.cmp(&a.date))
    });
    scored
        .into_iter()
        .take(RELATED_LIMIT)
        .map(|(_, p)| p)
        .collect()
}

/// The host services the post page needs. The clipboard borrow has its own
/// lifetime `'c`.
pub struct PostContext<'a, 'c> {
    /// The current location; its `slug` parameter selects the post and the
    /// copy-link control copies it.
    pub location: &'a Url,

    /// Appended to the post title in the document title.
    pub site_title: &'a str,

    pub features: Features,

    /// Clicks the copy-link control with this clipboard once the page is
    /// rendered, when set.
    pub copy_with: Option<&'c mut dyn Clipboard>,

    pub now: Instant,
}

/// Activates the post view on `doc`. Each step writes only to the elements
/// the page declares. Fails when the post fragment can't be fetched, after
/// the metadata has been written.
pub fn render_post<F: Fetch + ?Sized>(
    posts: &[Post],
    fetch: &F,
    ctx: PostContext,
    doc: &mut Document,
) -> Result<()> {
    let slug = slug_param(ctx.location);
    let (idx, post) = match resolve_post(posts, slug.as_deref()) {
        Some(resolved) => resolved,
        None => {
            render_placeholder(ctx.site_title, doc);
            return Ok(());
        }
    };
    log::debug!("rendering post `{}` (requested {:?})", post.slug, slug);

    render_metadata(post, &ctx, doc);
    render_tags(post, doc);

    let fragment = fetch_fragment(fetch, post)?;
    if let Some(body) = doc.element_mut(POST_BODY) {
        body.html = fragment;
        let reading_time = estimate_reading_time(&body.html.text_content());
        if let Some(read_time) = doc.element_mut(POST_READ_TIME) {
            read_time.set_text(&reading_time);
        }
    }

    render_copy_link(ctx, doc);
    render_neighbours(&neighbours(posts, idx), doc);
    render_related(&related_posts(posts, post), doc);
    Ok(())
}

/// Fetches the post's fragment. Fragments are author-controlled, so the
/// result is trusted markup.
pub fn fetch_fragment<F: Fetch + ?Sized>(fetch: &F, post: &Post) -> Result<Markup> {
    let path = format!("./posts/{}", urlencoding::encode(&post.file));
    fetch
        .fetch(&path)
        .map(Markup::trusted)
        .map_err(|err| Error::FragmentUnavailable {
            slug: post.slug.clone(),
            err,
        })
}

fn render_placeholder(site_title: &str, doc: &mut Document) {
    if let Some(title) = doc.element_mut(POST_TITLE) {
        title.set_text("Post");
    }
    doc.title = format!("Post , {}", site_title);
}

fn render_metadata(post: &Post, ctx: &PostContext, doc: &mut Document) {
    if let Some(title) = doc.element_mut(POST_TITLE) {
        title.set_text(post.page_title());
    }
    if let Some(date) = doc.element_mut(POST_DATE) {
        date.set_text(post.display_date());
    }
    if let Some(excerpt) = doc.element_mut(POST_EXCERPT) {
        excerpt.set_text(post.excerpt());
    }
    doc.title = format!("{} , {}", post.page_title(), ctx.site_title);

    if !ctx.features.header_images {
        return;
    }
    if let (Some(hero), Some(image)) = (doc.element_mut(POST_HERO), post.header_image()) {
        hero.style = Some(Markup::trusted(format!(
            "background-image:url('{}')",
            escape_html(image)
        )));
    }
}

fn render_tags(post: &Post, doc: &mut Document) {
    if let Some(tags) = doc.element_mut(POST_TAGS) {
        tags.html = Markup::trusted(
            post.tags
                .iter()
                .map(|t| format!(r#"<span class="tag" style="cursor:default">{}</span>"#, escape_html(t)))
                .collect::<String>(),
        );
    }
}

fn render_copy_link(ctx: PostContext, doc: &mut Document) {
    let control = match doc.element_mut(COPY_LINK) {
        Some(control) => control,
        None => return,
    };
    let mut copy_link = CopyLink::default();
    if let Some(clipboard) = ctx.copy_with {
        copy_link.click(clipboard, ctx.location.as_str(), ctx.now);
    }
    control.set_text(copy_link.label(ctx.now));
}

fn render_neighbours(neighbours: &Neighbours, doc: &mut Document) {
    for (id, neighbour) in &[(PREV_POST, neighbours.previous), (NEXT_POST, neighbours.next)] {
        let link = match doc.element_mut(id) {
            Some(link) => link,
            None => continue,
        };
        match neighbour {
            Some(post) => {
                link.href = Some(post.url());
                link.label = Some(Markup::escape(&post.title));
                link.set_visible(true);
            }
            None => link.set_visible(false),
        }
    }
}

fn render_related(related: &[&Post], doc: &mut Document) {
    let container = match doc.element_mut(RELATED) {
        Some(container) => container,
        None => return,
    };
    container.html = Markup::trusted(match related.is_empty() {
        true => String::from(r#"<span style="color:var(--muted)">No related posts yet.</span>"#),
        false => related
            .iter()
            .map(|p| {
                format!(
                    r#"<a class="btn secondary" href="{}"><span>{}</span></a>"#,
                    escape_html(&p.url()),
                    escape_html(&p.title)
                )
            })
            .collect::<Vec<String>>()
            .join(" "),
    });
}

/// The result of rendering a post page.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to render a post page.
#[derive(Debug)]
pub enum Error {
    /// The post's fragment could not be fetched.
    FragmentUnavailable { slug: String, err: FetchError },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FragmentUnavailable { slug, err } => {
                write!(f, "loading content for post `{}`: {}", slug, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FragmentUnavailable { slug: _, err } => Some(err),
        }
    }
}
