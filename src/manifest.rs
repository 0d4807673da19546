//! Loads the post manifest. See [`load_posts`].

use crate::fetch::{Error as FetchError, Fetch};
use crate::post::{Manifest, Post};
use std::fmt;

/// The site-relative location of the manifest.
pub const MANIFEST_PATH: &str = "./posts/posts.json";

/// Fetches and parses the manifest at `path` and returns its posts sorted by
/// date, most recent first. Dates are compared as plain strings and the sort
/// is stable, so posts sharing a date keep their manifest order.
pub fn load_posts<F: Fetch + ?Sized>(fetch: &F, path: &str) -> Result<Vec<Post>> {
    let body = fetch.fetch(path).map_err(Error::ManifestUnavailable)?;
    let manifest: Manifest =
        serde_json::from_str(&body).map_err(Error::ParseFailure)?;
    let mut posts = manifest.posts;
    sort_by_date(&mut posts);
    log::debug!("loaded {} posts from `{}`", posts.len(), path);
    Ok(posts)
}

/// Sorts posts by date, most recent first, preserving the relative order of
/// posts with equal dates.
pub fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The result of loading the manifest.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to load the manifest. Readers are shown the same
/// message for either variant.
#[derive(Debug)]
pub enum Error {
    /// The manifest could not be fetched.
    ManifestUnavailable(FetchError),

    /// The manifest is not in the expected shape.
    ParseFailure(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ManifestUnavailable(err) => {
                write!(f, "manifest unavailable: {}", err)
            }
            Error::ParseFailure(err) => write!(f, "parsing manifest: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ManifestUnavailable(err) => Some(err),
            Error::ParseFailure(err) => Some(err),
        }
    }
}
