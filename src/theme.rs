//! The light/dark display preference, persisted across visits.

use crate::dom::Document;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The preference key holding the theme name.
pub const THEME_KEY: &str = "theme";

pub const THEME_TOGGLE: &str = "themeToggle";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a persisted theme name. Anything other than `light` or `dark`
    /// is invalid.
    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    // The toggle describes what clicking it will do.
    fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light mode",
            Theme::Light => "Switch to dark mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persistent string key-value store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keeps preferences in a JSON object on disk. A missing or unreadable file
/// reads as empty.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    pub fn open(path: &Path) -> FilePreferenceStore {
        let values = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("ignoring malformed preferences `{}`: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        FilePreferenceStore {
            path: path.to_owned(),
            values,
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

/// Applies `theme` to the document and the toggle control, then persists it.
pub fn set_theme<S: PreferenceStore + ?Sized>(doc: &mut Document, store: &mut S, theme: Theme) -> Result<()> {
    doc.theme = Some(theme.as_str().to_owned());
    if let Some(toggle) = doc.element_mut(THEME_TOGGLE) {
        toggle.aria_label = Some(theme.toggle_label().to_owned());
        toggle.data_theme = Some(theme.as_str().to_owned());
    }
    store.set(THEME_KEY, theme.as_str())
}

/// Restores the persisted theme, or falls back to the platform's dark-mode
/// preference when nothing valid was persisted.
pub fn init_theme<S: PreferenceStore + ?Sized>(doc: &mut Document, store: &mut S, prefers_dark: bool) -> Result<Theme> {
    let theme = match store.get(THEME_KEY).as_deref().and_then(Theme::parse) {
        Some(saved) => saved,
        None => match prefers_dark {
            true => Theme::Dark,
            false => Theme::Light,
        },
    };
    set_theme(doc, store, theme)?;
    Ok(theme)
}

/// Flips the document's current theme (light when unset).
pub fn toggle_theme<S: PreferenceStore + ?Sized>(doc: &mut Document, store: &mut S) -> Result<Theme> {
    let current = doc.theme.as_deref().and_then(Theme::parse).unwrap_or(Theme::Light);
    let theme = current.toggled();
    set_theme(doc, store, theme)?;
    Ok(theme)
}

/// The result of a preference operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to persist a preference.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "saving preferences: {}", err),
            Error::Serialize(err) => write!(f, "saving preferences: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Serialize(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryStore(BTreeMap<String, String>);

    impl PreferenceStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    fn doc() -> Document {
        Document::with_ids(vec![THEME_TOGGLE])
    }

    #[test]
    fn test_set_theme() -> Result<()> {
        let mut doc = doc();
        let mut store = MemoryStore::default();
        set_theme(&mut doc, &mut store, Theme::Dark)?;

        assert_eq!(Some("dark"), doc.theme.as_deref());
        assert_eq!(Some(String::from("dark")), store.get(THEME_KEY));
        let toggle = doc.element(THEME_TOGGLE).cloned().unwrap_or_default();
        assert_eq!(Some("Switch to light mode"), toggle.aria_label.as_deref());
        assert_eq!(Some("dark"), toggle.data_theme.as_deref());
        Ok(())
    }

    #[test]
    fn test_init_theme() -> Result<()> {
        struct TestCase {
            saved: Option<&'static str>,
            prefers_dark: bool,
            wanted: Theme,
        }

        for case in &[
            TestCase { saved: Some("light"), prefers_dark: true, wanted: Theme::Light },
            TestCase { saved: Some("dark"), prefers_dark: false, wanted: Theme::Dark },
            TestCase { saved: Some("sepia"), prefers_dark: true, wanted: Theme::Dark },
            TestCase { saved: None, prefers_dark: false, wanted: Theme::Light },
            TestCase { saved: None, prefers_dark: true, wanted: Theme::Dark },
        ] {
            let mut store = MemoryStore::default();
            if let Some(saved) = case.saved {
                store.set(THEME_KEY, saved)?;
            }
            let mut doc = doc();
            assert_eq!(case.wanted, init_theme(&mut doc, &mut store, case.prefers_dark)?);
            assert_eq!(Some(case.wanted.as_str()), doc.theme.as_deref());
        }
        Ok(())
    }

    #[test]
    fn test_toggle_theme() -> Result<()> {
        let mut doc = doc();
        let mut store = MemoryStore::default();
        assert_eq!(Theme::Dark, toggle_theme(&mut doc, &mut store)?);
        assert_eq!(Theme::Light, toggle_theme(&mut doc, &mut store)?);
        assert_eq!(Some(String::from("light")), store.get(THEME_KEY));
        Ok(())
    }

    #[test]
    fn test_file_store_persists() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state").join("preferences.json");

        let mut store = FilePreferenceStore::open(&path);
        assert_eq!(None, store.get(THEME_KEY));
        store.set(THEME_KEY, "dark")?;

        let reopened = FilePreferenceStore::open(&path);
        assert_eq!(Some(String::from("dark")), reopened.get(THEME_KEY));
        Ok(())
    }

    #[test]
    fn test_file_store_ignores_malformed_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "not json")?;
        assert_eq!(None, FilePreferenceStore::open(&path).get(THEME_KEY));
        Ok(())
    }
}
