//! Defines the [`Fetch`] trait through which the manifest and post fragments
//! are requested, and [`DirFetcher`], which serves them from a site directory
//! on disk the way a static host would.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Requests site-relative resources as text. Paths are relative to the site
/// root and may carry percent-encoded segments (e.g.,
/// `posts/first%20post.html`).
pub trait Fetch {
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Serves resources from a directory on disk.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> DirFetcher {
        DirFetcher { root: root.into() }
    }

    // Resolves a request path to a file under `root`, refusing anything that
    // would escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let decoded = urlencoding::decode(path)
            .map_err(|_| Error::BadRequest(path.to_owned()))?;
        let relative = Path::new(decoded.trim_start_matches("./"));
        let mut resolved = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(Error::BadRequest(path.to_owned())),
            }
        }
        Ok(resolved)
    }
}

impl Fetch for DirFetcher {
    fn fetch(&self, path: &str) -> Result<String> {
        let file_path = self.resolve(path)?;
        log::debug!("fetching `{}` from `{}`", path, file_path.display());
        std::fs::read_to_string(&file_path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.to_owned()),
            _ => Error::Io {
                path: path.to_owned(),
                err,
            },
        })
    }
}

/// The result of a fetch.
pub type Result<T> = std::result::Result<T, Error>;

/// The non-success outcomes of a fetch.
#[derive(Debug)]
pub enum Error {
    /// The resource does not exist (the equivalent of a 404).
    NotFound(String),

    /// The request path is malformed or points outside the site.
    BadRequest(String),

    /// Reading the resource failed.
    Io { path: String, err: io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(path) => write!(f, "`{}` not found", path),
            Error::BadRequest(path) => write!(f, "bad request path `{}`", path),
            Error::Io { path, err } => write!(f, "reading `{}`: {}", path, err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::BadRequest(_) => None,
            Error::Io { path: _, err } => Some(err),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_decodes_path() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("posts"))?;
        std::fs::write(dir.path().join("posts/first post.html"), "<p>Hi</p>")?;

        let fetcher = DirFetcher::new(dir.path());
        assert_eq!("<p>Hi</p>", fetcher.fetch("./posts/first%20post.html")?);
        Ok(())
    }

    #[test]
    fn test_fetch_missing_file() {
        let fetcher = DirFetcher::new("./testdata/site");
        match fetcher.fetch("posts/missing.html") {
            Err(Error::NotFound(path)) => assert_eq!("posts/missing.html", path),
            other => panic!("wanted NotFound; found {:?}", other),
        }
    }

    #[test]
    fn test_fetch_refuses_parent_directories() {
        let fetcher = DirFetcher::new("./testdata/site");
        match fetcher.fetch("posts/%2E%2E/%2E%2E/Cargo.toml") {
            Err(Error::BadRequest(_)) => {}
            other => panic!("wanted BadRequest; found {:?}", other),
        }
    }
}
