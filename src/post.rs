//! Defines the [`Post`] record as it appears in the manifest and the
//! [`Manifest`] document that carries them.

use serde::{Deserialize, Deserializer};

/// The page that renders a single post. Post links address it with a `slug`
/// query parameter.
pub const POST_PAGE: &str = "./post.html";

/// A post's metadata. Posts are immutable once loaded; the post body lives in
/// a separate fragment file named by [`Post::file`].
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Post {
    /// Unique, URL-safe identifier.
    pub slug: String,

    pub title: String,

    /// Sortable date. Compared as a plain string, never parsed.
    pub date: String,

    /// Human-readable override for `date`.
    #[serde(default)]
    pub date_display: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    /// A `null` list reads as no tags.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    /// Path of the post fragment relative to the posts directory.
    pub file: String,

    #[serde(default, rename = "headerImage")]
    pub header_image: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// Empty strings in the manifest count as absent.
fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl Post {
    /// The date shown to readers, preferring a non-empty `date_display`.
    pub fn display_date(&self) -> &str {
        non_empty(&self.date_display).unwrap_or(&self.date)
    }

    /// The title used for the post page heading, `Post` when the title is
    /// empty.
    pub fn page_title(&self) -> &str {
        match self.title.as_str() {
            "" => "Post",
            title => title,
        }
    }

    pub fn header_image(&self) -> Option<&str> {
        non_empty(&self.header_image)
    }

    pub fn excerpt(&self) -> &str {
        self.excerpt.as_deref().unwrap_or_default()
    }

    /// The link to this post's page, with the slug percent-encoded.
    pub fn url(&self) -> String {
        format!("{}?slug={}", POST_PAGE, urlencoding::encode(&self.slug))
    }
}

/// The manifest document (`posts/posts.json`). A missing `posts` field is an
/// empty collection.
#[derive(Deserialize, Debug, Default)]
pub struct Manifest {
    #[serde(default)]
    pub posts: Vec<Post>,
}
