//! Exports the [`render_page`] function which stitches together the steps of
//! loading a page: applying the theme preference ([`crate::theme`]), loading
//! the manifest ([`crate::manifest`]), activating whichever views the page
//! shell has containers for ([`crate::index_view`], [`crate::post_view`]), and
//! rendering the shell template.

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::dom::Document;
use crate::fetch::Fetch;
use crate::index_view::{message_card, Event, IndexView, POST_GRID};
use crate::manifest::load_posts;
use crate::markup::Markup;
use crate::post_view::{render_post, PostContext, POST_BODY};
use crate::theme::{init_theme, PreferenceStore};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// A request for one page.
pub struct Page<'a> {
    /// The page shell template.
    pub shell: &'a Path,

    /// The page's location, including its query string.
    pub location: Url,

    /// Index-page interactions to replay after the page loads.
    pub events: &'a [Event],

    /// When set, the post page's copy-link control is clicked with this
    /// clipboard.
    pub clipboard: Option<&'a mut dyn Clipboard>,
}

/// Loads and renders a page. Manifest and post-content failures don't fail
/// the render: they are logged and, when configured, explained in the post
/// grid. Only problems with the shell itself are returned as errors.
pub fn render_page<F, S>(config: &Config, fetch: &F, preferences: &mut S, page: Page) -> Result<String>
where
    F: Fetch + ?Sized,
    S: PreferenceStore + ?Sized,
{
    let shell = std::fs::read_to_string(page.shell).map_err(|e| Error::OpenShell {
        path: page.shell.to_owned(),
        err: e,
    })?;
    let mut doc = Document::from_shell(&shell);

    if config.features.theme_toggle {
        if let Err(err) = init_theme(&mut doc, preferences, config.prefers_dark) {
            log::warn!("{}", err);
        }
    }

    match load_posts(fetch, &config.manifest) {
        Ok(posts) => {
            if doc.has(POST_GRID) {
                let mut view = IndexView::init(&posts, config.features, &mut doc);
                for event in page.events {
                    view.dispatch(event, &mut doc);
                }
            }
            if doc.has(POST_BODY) {
                let ctx = PostContext {
                    location: &page.location,
                    site_title: &config.site_title,
                    features: config.features,
                    copy_with: page.clipboard,
                    now: Instant::now(),
                };
                if let Err(err) = render_post(&posts, fetch, ctx, &mut doc) {
                    log::warn!("{}", err);
                }
            }
        }
        Err(err) => {
            log::warn!("{}", err);
            render_load_failure(config, &mut doc);
        }
    }

    doc.render(&shell).map_err(Error::Template)
}

fn render_load_failure(config: &Config, doc: &mut Document) {
    if !config.features.load_error_message {
        return;
    }
    if let Some(grid) = doc.element_mut(POST_GRID) {
        grid.html = message_card(
            "Posts didn’t load",
            &Markup::trusted(format!(
                "\n              Check that <code>{}</code> exists and you are running via a local server.\n            ",
                Markup::escape(config.manifest.trim_start_matches("./"))
            )),
        );
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for rendering a page: the shell can't be read or isn't a
/// valid template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while reading the page shell.
    OpenShell { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing or executing the shell template.
    Template(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenShell { path, err } => {
                write!(f, "Opening page shell '{}': {}", path.display(), err)
            }
            Error::Template(err) => write!(f, "Rendering page shell: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenShell { path: _, err } => Some(err),
            Error::Template(_) => None,
        }
    }
}
