//! Defines the [`Document`] model that the views render into. A page shell is
//! an HTML template; the elements it declares with `id="..."` attributes are
//! the only ones the views may touch. A view step whose target element is not
//! declared does nothing, so one shell can omit whole sections (or a whole
//! view) without the rendering code changing.

use crate::markup::Markup;
use gtmpl::Value;
use regex::Regex;
use std::collections::HashMap;

/// The rendered state of one element in the page shell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// The element's inner markup.
    pub html: Markup,
    pub href: Option<String>,

    /// The text of a link's inner `<span>`, already escaped.
    pub label: Option<Markup>,

    /// The reflected `value` attribute of an input, already escaped.
    pub value: Option<Markup>,

    pub style: Option<Markup>,

    /// `None` leaves the element's display untouched; `Some(false)` hides it.
    pub visible: Option<bool>,

    /// Set on a control's `data-theme` attribute.
    pub data_theme: Option<String>,
    pub aria_label: Option<String>,
}

impl Element {
    /// Replaces the element's content with escaped text.
    pub fn set_text(&mut self, text: &str) {
        self.html = Markup::escape(text);
    }

    /// Shows the element as an inline flex box, or hides it.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = Some(visible);
    }

    fn display(&self) -> Option<&'static str> {
        self.visible.map(|visible| match visible {
            true => "inline-flex",
            false => "none",
        })
    }

    fn to_value(&self, focused: bool) -> Value {
        let opt = |s: Option<&str>| match s {
            Some(s) => Value::String(s.to_owned()),
            None => Value::Nil,
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("html".to_owned(), Value::String(self.html.to_string()));
        m.insert("href".to_owned(), opt(self.href.as_deref()));
        m.insert("label".to_owned(), opt(self.label.as_ref().map(Markup::as_str)));
        m.insert("value".to_owned(), opt(self.value.as_ref().map(Markup::as_str)));
        m.insert("style".to_owned(), opt(self.style.as_ref().map(Markup::as_str)));
        m.insert("display".to_owned(), opt(self.display()));
        m.insert("data_theme".to_owned(), opt(self.data_theme.as_deref()));
        m.insert("aria_label".to_owned(), opt(self.aria_label.as_deref()));
        m.insert("focused".to_owned(), Value::Bool(focused));
        Value::Object(m)
    }
}

/// A page shell's element-id contract plus the document-level state the views
/// write (title, root `data-theme`, focus).
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: HashMap<String, Element>,

    /// The document title, as plain text.
    pub title: String,

    /// The root element's `data-theme` attribute.
    pub theme: Option<String>,

    /// The id of the focused element, if any.
    pub focused: Option<String>,
}

impl Document {
    /// Builds a document declaring exactly the elements whose ids appear in
    /// `shell`.
    pub fn from_shell(shell: &str) -> Document {
        let id_attr = Regex::new(r#"(?:^|\s)id\s*=\s*["']([^"']+)["']"#)
            .expect("element id pattern is valid");
        Document::with_ids(id_attr.captures_iter(shell).map(|c| c[1].to_owned()))
    }

    /// Builds a document declaring the given element ids.
    pub fn with_ids<I, S>(ids: I) -> Document
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Document {
            elements: ids
                .into_iter()
                .map(|id| (id.into(), Element::default()))
                .collect(),
            ..Document::default()
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Returns the element with `id`, or `None` when the shell doesn't declare
    /// it.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Converts the document into a template value. The result is a
    /// [`Value::Object`] with one field per declared element id plus `title`
    /// and `theme`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = self
            .elements
            .iter()
            .map(|(id, element)| {
                let focused = self.focused.as_deref() == Some(id.as_str());
                (id.clone(), element.to_value(focused))
            })
            .collect();
        m.insert(
            "title".to_owned(),
            Value::String(Markup::escape(&self.title).into()),
        );
        m.insert(
            "theme".to_owned(),
            match &self.theme {
                Some(theme) => Value::String(theme.clone()),
                None => Value::Nil,
            },
        );
        Value::Object(m)
    }

    /// Renders `shell` as a template against this document.
    pub fn render(&self, shell: &str) -> Result<String, String> {
        gtmpl::template(shell, self.to_value()).map_err(|e| e.to_string())
    }
}
