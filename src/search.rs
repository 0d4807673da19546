//! The tag universe and the filter predicate behind the index page's tag bar
//! and search box.

use crate::post::Post;
use std::cmp::Ordering;
use std::collections::HashSet;

/// The `data-tag` value carried by the "All" control.
pub const ALL_TAG: &str = "__all";

/// Returns the distinct tags across `posts`. Tags are compared
/// case-sensitively for deduplication and ordered with [`locale_cmp`].
pub fn unique_tags(posts: &[Post]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags: Vec<String> = posts
        .iter()
        .flat_map(|p| p.tags.iter())
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect();
    tags.sort_by(|a, b| locale_cmp(a, b));
    tags
}

/// Orders strings the way a reader expects in a tag list. Strings are first
/// compared on a folded key: diacritics are transliterated away, case is
/// ignored, and whitespace and punctuation sort before digits, which sort
/// before letters. Ties are broken by accents (unaccented first), then case
/// (lowercase first), then code point.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .map(|(x, y)| x.is_uppercase().cmp(&y.is_uppercase()))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> Vec<(u8, char)> {
    deunicode::deunicode(s)
        .to_lowercase()
        .chars()
        .map(|c| {
            let class = match c {
                c if c.is_whitespace() => 0,
                c if c.is_alphabetic() => 3,
                c if c.is_numeric() => 2,
                _ => 1,
            };
            (class, c)
        })
        .collect()
}

/// The tag selected in the tag bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveTag {
    /// The unfiltered sentinel.
    All,
    Tag(String),
}

impl ActiveTag {
    /// Parses a control's `data-tag` value.
    pub fn from_data_tag(data_tag: &str) -> ActiveTag {
        match data_tag {
            ALL_TAG => ActiveTag::All,
            tag => ActiveTag::Tag(tag.to_owned()),
        }
    }

    /// The `data-tag` value of the control for this tag.
    pub fn data_tag(&self) -> &str {
        match self {
            ActiveTag::All => ALL_TAG,
            ActiveTag::Tag(tag) => tag,
        }
    }
}

impl Default for ActiveTag {
    fn default() -> Self {
        ActiveTag::All
    }
}

/// The index page's filter state: the active tag and the raw search text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filter {
    pub tag: ActiveTag,
    pub query: String,
}

impl Filter {
    /// The query as it is matched: trimmed and lowercased.
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    pub fn matches(&self, post: &Post) -> bool {
        matches(&self.tag, &self.normalized_query(), post)
    }
}

// `query` must already be normalized.
fn matches(tag: &ActiveTag, query: &str, post: &Post) -> bool {
    let in_tag = match tag {
        ActiveTag::All => true,
        ActiveTag::Tag(tag) => post.tags.iter().any(|t| t == tag),
    };
    if !in_tag {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    format!("{} {} {}", post.title, post.excerpt(), post.tags.join(" "))
        .to_lowercase()
        .contains(query)
}

/// Returns the posts matching `filter`, in their original order.
pub fn filter_posts<'a>(posts: &'a [Post], filter: &Filter) -> Vec<&'a Post> {
    let query = filter.normalized_query();
    posts
        .iter()
        .filter(|p| matches(&filter.tag, &query, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, title: &str, excerpt: Option<&str>, tags: &[&str]) -> Post {
        Post {
            slug: slug.to_owned(),
            title: title.to_owned(),
            date: String::from("2024-01-01"),
            excerpt: excerpt.map(str::to_owned),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            file: format!("{}.html", slug),
            ..Post::default()
        }
    }

    fn fixture() -> Vec<Post> {
        vec![
            post("borrow", "Borrowing", Some("The borrow checker"), &["rust", "lang"]),
            post("bread", "Sourdough", Some("Starter notes"), &["baking"]),
            post("tests", "Testing", None, &["rust", "Testing"]),
            post("untagged", "Misc", Some("Odds & ends"), &[]),
        ]
    }

    fn slugs(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_unique_tags_sorted_without_duplicates() {
        let tags = unique_tags(&fixture());
        assert_eq!(vec!["baking", "lang", "rust", "Testing"], tags);
        let distinct: HashSet<_> = tags.iter().collect();
        assert_eq!(tags.len(), distinct.len());
        for pair in tags.windows(2) {
            assert_eq!(Ordering::Less, locale_cmp(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn test_unique_tags_is_case_sensitive() {
        let posts = vec![
            post("a", "A", None, &["Rust", "rust", "rust"]),
            post("b", "B", None, &["apple", "Rust"]),
        ];
        assert_eq!(vec!["apple", "rust", "Rust"], unique_tags(&posts));
    }

    #[test]
    fn test_unique_tags_accents_and_punctuation() {
        let posts = vec![
            post("a", "A", None, &["zebra", "éclair", "{meta}"]),
            post("b", "B", None, &["apple", "2024", "Eclair"]),
        ];
        assert_eq!(
            vec!["{meta}", "2024", "apple", "Eclair", "éclair", "zebra"],
            unique_tags(&posts)
        );
    }

    #[test]
    fn test_locale_cmp() {
        struct TestCase {
            a: &'static str,
            b: &'static str,
            wanted: Ordering,
        }

        for case in &[
            TestCase { a: "resume", b: "résumé", wanted: Ordering::Less },
            TestCase { a: "Resume", b: "résumé", wanted: Ordering::Less },
            TestCase { a: "résumé", b: "Résumé", wanted: Ordering::Less },
            TestCase { a: "rust", b: "rust-lang", wanted: Ordering::Less },
            TestCase { a: "~tilde", b: "alpha", wanted: Ordering::Less },
            TestCase { a: "9lives", b: "alpha", wanted: Ordering::Less },
            TestCase { a: "Ångström", b: "apple", wanted: Ordering::Less },
            TestCase { a: "same", b: "same", wanted: Ordering::Equal },
        ] {
            assert_eq!(
                case.wanted,
                locale_cmp(case.a, case.b),
                "{:?} vs {:?}",
                case.a,
                case.b
            );
        }
    }

    #[test]
    fn test_unique_tags_empty() {
        assert!(unique_tags(&[]).is_empty());
    }

    #[test]
    fn test_active_tag_data_tag() {
        assert_eq!(ActiveTag::All, ActiveTag::from_data_tag("__all"));
        assert_eq!(
            ActiveTag::Tag(String::from("rust")),
            ActiveTag::from_data_tag("rust")
        );
        assert_eq!("__all", ActiveTag::All.data_tag());
    }

    #[test]
    fn test_filter_posts() {
        struct TestCase {
            name: &'static str,
            tag: ActiveTag,
            query: &'static str,
            wanted: Vec<&'static str>,
        }

        let posts = fixture();
        for case in vec![
            TestCase {
                name: "all, no query",
                tag: ActiveTag::All,
                query: "",
                wanted: vec!["borrow", "bread", "tests", "untagged"],
            },
            TestCase {
                name: "tag only",
                tag: ActiveTag::Tag(String::from("rust")),
                query: "",
                wanted: vec!["borrow", "tests"],
            },
            TestCase {
                name: "tag is case-sensitive",
                tag: ActiveTag::Tag(String::from("testing")),
                query: "",
                wanted: vec![],
            },
            TestCase {
                name: "query matches title case-insensitively",
                tag: ActiveTag::All,
                query: "  SOURDOUGH ",
                wanted: vec!["bread"],
            },
            TestCase {
                name: "query matches excerpt",
                tag: ActiveTag::All,
                query: "checker",
                wanted: vec!["borrow"],
            },
            TestCase {
                name: "query matches tags",
                tag: ActiveTag::All,
                query: "baking",
                wanted: vec!["bread"],
            },
            TestCase {
                name: "query spans fields",
                tag: ActiveTag::All,
                query: "checker rust",
                wanted: vec!["borrow"],
            },
            TestCase {
                name: "tag and query",
                tag: ActiveTag::Tag(String::from("rust")),
                query: "testing",
                wanted: vec!["tests"],
            },
            TestCase {
                name: "no match",
                tag: ActiveTag::All,
                query: "zebra",
                wanted: vec![],
            },
        ] {
            let filter = Filter {
                tag: case.tag,
                query: case.query.to_owned(),
            };
            assert_eq!(
                case.wanted,
                slugs(&filter_posts(&posts, &filter)),
                "case: {}",
                case.name
            );
        }
    }

    #[test]
    fn test_filter_posts_is_idempotent() {
        let posts = fixture();
        let filter = Filter {
            tag: ActiveTag::Tag(String::from("rust")),
            query: String::from("t"),
        };
        let first = filter_posts(&posts, &filter);
        let second = filter_posts(&posts, &filter);
        assert_eq!(first, second);
        assert!(posts.iter().all(|p| filter.matches(p) == first.contains(&p)));
    }
}
