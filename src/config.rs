use crate::manifest::MANIFEST_PATH;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The project file looked up from the starting directory upward.
pub const PROJECT_FILE: &str = "postboard.yaml";

/// Optional behaviour that differs between page variants.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Features {
    /// Card backgrounds and the post hero use `headerImage`.
    pub header_images: bool,

    /// An empty grid shows "No posts found" instead of nothing.
    pub no_results_message: bool,

    /// A manifest failure shows an explanation in the grid instead of failing
    /// silently.
    pub load_error_message: bool,

    /// Pages carry the light/dark preference.
    pub theme_toggle: bool,

    /// Ctrl/Cmd+K focuses the search box.
    pub search_shortcut: bool,
}

impl Default for Features {
    fn default() -> Self {
        Features {
            header_images: true,
            no_results_message: true,
            load_error_message: true,
            theme_toggle: false,
            search_shortcut: false,
        }
    }
}

#[derive(Deserialize)]
struct SiteTitle(String);
impl Default for SiteTitle {
    fn default() -> Self {
        SiteTitle(String::from("Shane Parkes Crosby"))
    }
}

#[derive(Deserialize)]
struct SiteUrl(Url);
impl Default for SiteUrl {
    fn default() -> Self {
        SiteUrl(Url::parse("http://localhost/").expect("default site URL is valid"))
    }
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    site_title: SiteTitle,

    #[serde(default)]
    site_url: SiteUrl,

    #[serde(default)]
    manifest: Option<String>,

    #[serde(default)]
    index_shell: Option<PathBuf>,

    #[serde(default)]
    post_shell: Option<PathBuf>,

    #[serde(default)]
    preferences: Option<PathBuf>,

    #[serde(default)]
    clipboard_command: Option<Vec<String>>,

    #[serde(default)]
    prefers_dark: bool,

    #[serde(default)]
    features: Features,
}

pub struct Config {
    /// The directory served as the site root.
    pub site_directory: PathBuf,
    pub site_title: String,

    /// The URL the site root is served from. Page locations are resolved
    /// against it.
    pub site_url: Url,

    /// The manifest's site-relative path.
    pub manifest: String,
    pub index_shell: PathBuf,
    pub post_shell: PathBuf,
    pub preferences: PathBuf,

    /// The clipboard program and its arguments. Detected from `PATH` when
    /// unset.
    pub clipboard_command: Option<(String, Vec<String>)>,

    /// The platform's dark-mode hint, used when no theme was persisted.
    pub prefers_dark: bool,
    pub features: Features,
}

impl Config {
    /// Finds `postboard.yaml` in `dir` or the nearest parent directory that
    /// has one and loads it.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        use crate::util::open;
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(site_directory) => {
                let clipboard_command = match project.clipboard_command {
                    None => None,
                    Some(command) => match command.split_first() {
                        Some((program, args)) => Some((program.clone(), args.to_vec())),
                        None => return Err(anyhow!("`clipboard_command` must name a program")),
                    },
                };
                Ok(Config {
                    site_directory: site_directory.to_owned(),
                    site_title: project.site_title.0,
                    site_url: project.site_url.0,
                    manifest: project
                        .manifest
                        .unwrap_or_else(|| MANIFEST_PATH.to_owned()),
                    index_shell: site_directory
                        .join(project.index_shell.unwrap_or_else(|| PathBuf::from("index.html"))),
                    post_shell: site_directory
                        .join(project.post_shell.unwrap_or_else(|| PathBuf::from("post.html"))),
                    preferences: site_directory.join(
                        project
                            .preferences
                            .unwrap_or_else(|| PathBuf::from(".postboard/preferences.json")),
                    ),
                    clipboard_command,
                    prefers_dark: project.prefers_dark,
                    features: project.features,
                })
            }
        }
    }

    /// The location of a page shell, given its path relative to the site
    /// directory.
    pub fn page_url(&self, shell: &Path) -> Result<Url> {
        let relative = shell.strip_prefix(&self.site_directory).unwrap_or(shell);
        Ok(self.site_url.join(&relative.to_string_lossy())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata/site/posts"))?;
        assert_eq!(Path::new("./testdata/site"), config.site_directory);
        assert_eq!("Test Blog", config.site_title);
        assert_eq!("./posts/posts.json", config.manifest);
        assert_eq!(Path::new("./testdata/site/index.html"), config.index_shell);
        assert!(config.features.theme_toggle);
        assert!(config.features.search_shortcut);
        assert!(config.features.header_images);
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(PROJECT_FILE), "{}\n")?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!("Shane Parkes Crosby", config.site_title);
        assert_eq!("http://localhost/", config.site_url.as_str());
        assert_eq!(dir.path().join("post.html"), config.post_shell);
        assert_eq!(Features::default(), config.features);
        assert_eq!(None, config.clipboard_command);
        Ok(())
    }

    #[test]
    fn test_clipboard_command() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(PROJECT_FILE),
            "clipboard_command: [xclip, -selection, clipboard]\n",
        )?;
        let config = Config::from_directory(dir.path())?;
        assert_eq!(
            Some((
                String::from("xclip"),
                vec![String::from("-selection"), String::from("clipboard")]
            )),
            config.clipboard_command
        );
        Ok(())
    }

    #[test]
    fn test_page_url() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata/site"))?;
        assert_eq!(
            "https://blog.example.com/post.html",
            config.page_url(&config.post_shell)?.as_str()
        );
        Ok(())
    }
}
