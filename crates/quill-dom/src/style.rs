//! Inline-style signatures for formatting runs.
//!
//! The normalizer merges adjacent sibling wrappers only when their full
//! resolved style signatures are identical: font family, color, background,
//! weight, style, and decoration. Comparison is over normalized declaration
//! values, not raw attribute strings, so `COLOR:Red;` and `color: red`
//! compare equal.

use smol_str::SmolStr;

use crate::node::Element;

/// Tags that act as pure inline formatting wrappers.
pub const FORMATTING_TAGS: &[&str] = &["span", "b", "strong", "i", "em", "u", "font"];

/// Resolved style signature of a formatting run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSignature {
    pub font_family: Option<SmolStr>,
    pub color: Option<SmolStr>,
    pub background: Option<SmolStr>,
    pub font_weight: Option<SmolStr>,
    pub font_style: Option<SmolStr>,
    pub text_decoration: Option<SmolStr>,
}

impl StyleSignature {
    /// Parse a signature from a raw `style` attribute value.
    pub fn from_style_attr(style: &str) -> Self {
        let mut sig = Self::default();
        for decl in style.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let prop = prop.trim().to_ascii_lowercase();
            let value = normalize_value(value);
            if value.is_empty() {
                continue;
            }
            match prop.as_str() {
                "font-family" => sig.font_family = Some(value),
                "color" => sig.color = Some(value),
                "background" | "background-color" => sig.background = Some(value),
                "font-weight" => sig.font_weight = Some(value),
                "font-style" => sig.font_style = Some(value),
                "text-decoration" | "text-decoration-line" => sig.text_decoration = Some(value),
                _ => {}
            }
        }
        sig
    }

    /// Resolve the signature of an element, folding in tag-implied styles
    /// (`<b>` implies bold, `<u>` implies underline, ...).
    pub fn resolve(el: &Element) -> Self {
        let mut sig = el
            .attr("style")
            .map(Self::from_style_attr)
            .unwrap_or_default();
        match el.tag.as_str() {
            "b" | "strong" => {
                sig.font_weight.get_or_insert(SmolStr::new_static("bold"));
            }
            "i" | "em" => {
                sig.font_style.get_or_insert(SmolStr::new_static("italic"));
            }
            "u" => {
                sig.text_decoration
                    .get_or_insert(SmolStr::new_static("underline"));
            }
            _ => {}
        }
        sig
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

fn normalize_value(value: &str) -> SmolStr {
    let collapsed: Vec<&str> = value.split_ascii_whitespace().collect();
    SmolStr::new(collapsed.join(" ").to_ascii_lowercase())
}

/// Whether an element is a pure formatting wrapper: a formatting tag
/// carrying nothing beyond an inline style. Wrappers with ids, classes,
/// or data attributes are semantic and are never merged or dropped.
pub fn is_formatting_wrapper(el: &Element) -> bool {
    FORMATTING_TAGS.contains(&el.tag.as_str())
        && el.attrs.iter().all(|(name, _)| name == "style")
}
