//! Markup tree node types.
//!
//! Content is a `Fragment` of sibling `Node`s. There is no document node:
//! editor regions hold fragments, not full documents.

use smol_str::SmolStr;

/// Tags that never have children and never get a closing tag.
pub(crate) const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags whose content is raw text (no child elements, no entity decoding).
pub(crate) const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// A single markup node: element or text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Create a text node.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }

    /// Visible text length in chars (text nodes only, recursively).
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Element(el) => el.children.iter().map(Node::text_len).sum(),
        }
    }

    /// Append all visible text to `out`.
    pub fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(s) => out.push_str(s),
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// An element: lowercased tag, attribute list in source order, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: SmolStr,
    pub attrs: Vec<(SmolStr, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<SmolStr>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    /// Remove an attribute. Returns the removed value, if any.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(n, _)| n == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Whether the `class` attribute contains the given class name.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Whether this tag is a void element (`<br>`, `<img>`, ...).
    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    /// Whether this element has editable or input semantics.
    ///
    /// Content inside such elements is the user's in-progress typing and
    /// must never be rewritten by scanning passes.
    pub fn is_editable(&self) -> bool {
        if self.tag == "input" || self.tag == "textarea" {
            return true;
        }
        match self.attr("contenteditable") {
            Some(v) => !v.eq_ignore_ascii_case("false"),
            None => false,
        }
    }

    /// Whether this element has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A sequence of sibling nodes: the root of an editable region or a
/// parsed insertion snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total visible text length in chars.
    pub fn text_len(&self) -> usize {
        self.children.iter().map(Node::text_len).sum()
    }

    /// All visible text, concatenated.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(children: Vec<Node>) -> Self {
        Self { children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_roundtrip() {
        let mut el = Element::new("span");
        assert_eq!(el.attr("style"), None);

        el.set_attr("style", "font-weight: bold");
        assert_eq!(el.attr("style"), Some("font-weight: bold"));

        el.set_attr("style", "font-style: italic");
        assert_eq!(el.attr("style"), Some("font-style: italic"));
        assert_eq!(el.attrs.len(), 1);

        assert_eq!(el.remove_attr("style").as_deref(), Some("font-style: italic"));
        assert_eq!(el.attr("style"), None);
    }

    #[test]
    fn test_has_class() {
        let el = Element::new("span").with_attr("class", "math-render math-inline");
        assert!(el.has_class("math-render"));
        assert!(el.has_class("math-inline"));
        assert!(!el.has_class("math"));
    }

    #[test]
    fn test_editable_semantics() {
        assert!(Element::new("textarea").is_editable());
        assert!(Element::new("input").is_editable());
        assert!(Element::new("div").with_attr("contenteditable", "").is_editable());
        assert!(Element::new("div").with_attr("contenteditable", "true").is_editable());
        assert!(!Element::new("div").with_attr("contenteditable", "false").is_editable());
        assert!(!Element::new("div").is_editable());
    }

    #[test]
    fn test_text_projection() {
        let frag = Fragment::from(vec![
            Node::Element(
                Element::new("p")
                    .with_child(Node::text("hello "))
                    .with_child(Node::Element(
                        Element::new("b").with_child(Node::text("world")),
                    )),
            ),
            Node::text("!"),
        ]);
        assert_eq!(frag.text(), "hello world!");
        assert_eq!(frag.text_len(), 12);
    }
}
