//! Defines the boundary between untrusted text and trusted markup. Text coming
//! from the manifest or from the reader (post titles, tags, search queries) is
//! only ever turned into [`Markup`] via [`Markup::escape`], while post
//! fragments fetched from the site are author-controlled and enter through
//! [`Markup::trusted`] without escaping.

use std::fmt;

/// Escapes the five reserved markup characters (`&`, `<`, `>`, `"`, `'`).
/// Escaping is not idempotent: escaping an already-escaped string escapes its
/// ampersands again.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// A string that is safe to insert into a page as markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wraps author-controlled markup (a fetched post fragment or markup this
    /// crate generated itself) without escaping it.
    pub fn trusted<S: Into<String>>(markup: S) -> Markup {
        Markup(markup.into())
    }

    /// Escapes untrusted text into markup.
    pub fn escape(text: &str) -> Markup {
        Markup(escape_html(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the text a reader would see: tags and comments are dropped and
    /// the common character references are decoded. Adjacent elements are not
    /// separated by whitespace, so `<p>a</p><p>b</p>` reads as `ab`.
    pub fn text_content(&self) -> String {
        let mut text = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();
        while let Some(i) = rest.find(|c: char| c == '<' || c == '&') {
            text.push_str(&rest[..i]);
            rest = &rest[i..];
            if rest.starts_with("<!--") {
                rest = match rest.find("-->") {
                    Some(end) => &rest[end + 3..],
                    None => "",
                };
            } else if rest.starts_with('<') {
                rest = match rest.find('>') {
                    Some(end) => &rest[end + 1..],
                    None => "",
                };
            } else {
                let len = decode_reference(rest, &mut text);
                rest = &rest[len..];
            }
        }
        text.push_str(rest);
        text
    }
}

// Decodes the character reference at the start of `s` onto `out`, returning
// the number of bytes consumed. Numeric references (`&#160;`, `&#xa0;`) are
// decoded in general; of the named ones only the common few are. Anything
// else passes through as a bare `&`.
fn decode_reference(s: &str, out: &mut String) -> usize {
    const REFERENCES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];
    for (reference, decoded) in REFERENCES {
        if s.starts_with(reference) {
            out.push(*decoded);
            return reference.len();
        }
    }
    if let Some((c, len)) = decode_numeric(s) {
        out.push(c);
        return len;
    }
    out.push('&');
    1
}

fn decode_numeric(s: &str) -> Option<(char, usize)> {
    let digits = s.strip_prefix("&#")?;
    let end = digits.find(';')?;
    let (number, radix) = match digits[..end].strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => (hex, 16),
        None => (&digits[..end], 10),
    };
    if number.is_empty() || !number.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let code = u32::from_str_radix(number, radix).ok()?;
    let c = match code {
        0 => '\u{fffd}',
        code => std::char::from_u32(code).unwrap_or('\u{fffd}'),
    };
    Some((c, end + 3))
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Markup> for String {
    fn from(markup: Markup) -> String {
        markup.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_reserved_characters() {
        assert_eq!("&lt;a&gt;&amp;&quot;&#039;", escape_html("<a>&\"'"));
    }

    #[test]
    fn test_escape_html_is_not_idempotent() {
        let once = escape_html("<a>&\"'");
        assert_eq!(
            "&amp;lt;a&amp;gt;&amp;amp;&amp;quot;&amp;#039;",
            escape_html(&once)
        );
    }

    #[test]
    fn test_reading_words_split_at_numeric_spaces() {
        let text = Markup::trusted("<p>one&#160;two&#xa0;three</p>").text_content();
        assert_eq!(3, text.split_whitespace().count());
    }

    #[test]
    fn test_escape_html_leaves_plain_text() {
        assert_eq!("Hello, world", escape_html("Hello, world"));
    }

    #[test]
    fn test_trusted_markup_is_not_escaped() {
        let markup = Markup::trusted("<p>Hi & bye</p>");
        assert_eq!("<p>Hi & bye</p>", markup.as_str());
        assert_eq!("&lt;p&gt;", Markup::escape("<p>").as_str());
    }

    #[test]
    fn test_text_content() {
        struct TestCase {
            markup: &'static str,
            wanted: &'static str,
        }

        for case in &[
            TestCase {
                markup: "<p>one <em>two</em></p>\n<p>three</p>",
                wanted: "one two\nthree",
            },
            TestCase {
                markup: "<p>a</p><p>b</p>",
                wanted: "ab",
            },
            TestCase {
                markup: "x<!-- hidden <b>note</b> -->y",
                wanted: "xy",
            },
            TestCase {
                markup: "fish &amp; chips &copy;",
                wanted: "fish & chips &copy;",
            },
            TestCase {
                markup: "one&#160;two&#xA0;three &#039;four&#39; &#x1F600;",
                wanted: "one\u{a0}two\u{a0}three 'four' \u{1F600}",
            },
            TestCase {
                markup: "&#; &#xzz; &#12",
                wanted: "&#; &#xzz; &#12",
            },
            TestCase {
                markup: "unterminated <span",
                wanted: "unterminated ",
            },
        ] {
            assert_eq!(
                case.wanted,
                Markup::trusted(case.markup).text_content(),
                "markup: {:?}",
                case.markup
            );
        }
    }
}
