//! Math substitution scanner.
//!
//! Two passes, block delimiters before inline ones: block math can contain
//! newlines and nested `$`, which would corrupt a combined single-pass
//! scan. Inline `$...$` spans never cross newlines and a span whose whole
//! body is a plain (optionally decimal) number is left literal - currency,
//! not math.
//!
//! String mode rewrites a markup string directly. Tree mode walks an owned
//! fragment top-down, scans text nodes only, and splices rendered nodes in
//! place - skipping script/style elements, editable regions, and anything
//! already inside a rendered-math node.

use quill_dom::{Element, Fragment, Node, parse_fragment, serialize_fragment};
use tracing::trace;

use crate::math::{RENDERED_CLASS, SOURCE_ATTR, render_math_node};

/// The four delimiter pairs of the math notation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `\[ ... \]` - block.
    BracketBlock,
    /// `$$ ... $$` - block.
    DollarBlock,
    /// `\( ... \)` - inline.
    ParenInline,
    /// `$ ... $` - inline, single line, currency-guarded.
    DollarInline,
}

impl Delimiter {
    pub const ALL: [Delimiter; 4] = [
        Delimiter::BracketBlock,
        Delimiter::DollarBlock,
        Delimiter::ParenInline,
        Delimiter::DollarInline,
    ];

    pub fn open(self) -> &'static str {
        match self {
            Self::BracketBlock => r"\[",
            Self::DollarBlock => "$$",
            Self::ParenInline => r"\(",
            Self::DollarInline => "$",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Self::BracketBlock => r"\]",
            Self::DollarBlock => "$$",
            Self::ParenInline => r"\)",
            Self::DollarInline => "$",
        }
    }

    pub fn is_display(self) -> bool {
        matches!(self, Self::BracketBlock | Self::DollarBlock)
    }
}

/// A delimited math span found in a text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathSpan<'a> {
    /// Byte range of the full span, delimiters included.
    pub start: usize,
    pub end: usize,
    /// Notation between the delimiters.
    pub body: &'a str,
    pub delimiter: Delimiter,
}

impl<'a> MathSpan<'a> {
    /// The full delimited source text of the span.
    pub fn source(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Find block-mode spans (`\[...\]`, `$$...$$`). First pass.
pub fn find_block_spans(text: &str) -> Vec<MathSpan<'_>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let bracket = text[pos..].find(r"\[").map(|i| (pos + i, Delimiter::BracketBlock));
        let dollar = text[pos..].find("$$").map(|i| (pos + i, Delimiter::DollarBlock));

        let Some((start, delimiter)) = [bracket, dollar]
            .into_iter()
            .flatten()
            .min_by_key(|(start, _)| *start)
        else {
            break;
        };

        let body_start = start + delimiter.open().len();
        match text[body_start..].find(delimiter.close()) {
            Some(rel) => {
                let body_end = body_start + rel;
                let end = body_end + delimiter.close().len();
                spans.push(MathSpan {
                    start,
                    end,
                    body: &text[body_start..body_end],
                    delimiter,
                });
                pos = end;
            }
            None => {
                // Unterminated opener: step past it, the other kind may
                // still match later in the text.
                pos = body_start;
            }
        }
    }

    spans
}

/// Find inline-mode spans (`\(...\)`, `$...$`). Second pass.
///
/// Single-dollar spans must be non-empty, stay on one line, and fail the
/// currency guard check.
pub fn find_inline_spans(text: &str) -> Vec<MathSpan<'_>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let paren = text[pos..].find(r"\(").map(|i| (pos + i, Delimiter::ParenInline));
        let dollar = text[pos..].find('$').map(|i| (pos + i, Delimiter::DollarInline));

        let Some((start, delimiter)) = [paren, dollar]
            .into_iter()
            .flatten()
            .min_by_key(|(start, _)| *start)
        else {
            break;
        };

        match delimiter {
            Delimiter::ParenInline => {
                let body_start = start + 2;
                match text[body_start..].find(r"\)") {
                    Some(rel) => {
                        let body_end = body_start + rel;
                        spans.push(MathSpan {
                            start,
                            end: body_end + 2,
                            body: &text[body_start..body_end],
                            delimiter,
                        });
                        pos = body_end + 2;
                    }
                    None => pos = body_start,
                }
            }
            _ => {
                let body_start = start + 1;
                match inline_dollar_close(&text[body_start..]) {
                    Some(rel) => {
                        let body = &text[body_start..body_start + rel];
                        let end = body_start + rel + 1;
                        if is_plain_number(body) {
                            // Currency, not math: both dollars stay literal.
                            trace!(body, "skipping currency-like inline span");
                        } else {
                            spans.push(MathSpan {
                                start,
                                end,
                                body,
                                delimiter,
                            });
                        }
                        pos = end;
                    }
                    None => pos = body_start,
                }
            }
        }
    }

    spans
}

/// Find the closing `$` for an inline span: at least one body char, no
/// newline and no `$` inside.
fn inline_dollar_close(after_open: &str) -> Option<usize> {
    for (idx, ch) in after_open.char_indices() {
        match ch {
            '\n' => return None,
            '$' if idx > 0 => return Some(idx),
            '$' => return None,
            _ => {}
        }
    }
    None
}

/// Whether a span body is a bare integer or decimal (`5`, `10.25`).
fn is_plain_number(body: &str) -> bool {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return false;
    }
    let mut parts = trimmed.splitn(3, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next();
    if parts.next().is_some() {
        return false;
    }
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && frac.is_none_or(digits)
}

/// Replace every math span in a plain string with rendered markup.
///
/// Block pass first; its outputs are sealed so the inline pass never
/// rescans rendered markup (error spans can echo `$` from the source).
pub fn substitute_math(text: &str) -> String {
    enum Seg {
        Literal(String),
        Sealed(String),
    }

    let mut segments = Vec::new();
    let mut last = 0;
    for span in find_block_spans(text) {
        if span.start > last {
            segments.push(Seg::Literal(text[last..span.start].to_string()));
        }
        segments.push(Seg::Sealed(node_html(render_math_node(
            span.source(text),
            span.body,
            span.delimiter,
        ))));
        last = span.end;
    }
    if last < text.len() {
        segments.push(Seg::Literal(text[last..].to_string()));
    }

    let mut out = String::with_capacity(text.len());
    for seg in segments {
        match seg {
            Seg::Sealed(html) => out.push_str(&html),
            Seg::Literal(lit) => {
                let mut last = 0;
                for span in find_inline_spans(&lit) {
                    out.push_str(&lit[last..span.start]);
                    out.push_str(&node_html(render_math_node(
                        span.source(&lit),
                        span.body,
                        span.delimiter,
                    )));
                    last = span.end;
                }
                out.push_str(&lit[last..]);
            }
        }
    }
    out
}

fn node_html(el: Element) -> String {
    serialize_fragment(&Fragment::from(vec![Node::Element(el)]))
}

/// Walk a fragment and replace math spans in its text nodes in place.
///
/// Returns the number of spans rendered.
pub fn process_fragment(fragment: &mut Fragment) -> usize {
    process_children(&mut fragment.children)
}

fn process_children(children: &mut Vec<Node>) -> usize {
    let mut rendered = 0;
    let mut idx = 0;
    while idx < children.len() {
        match &mut children[idx] {
            Node::Element(el) => {
                if scannable(el) {
                    rendered += process_children(&mut el.children);
                }
                idx += 1;
            }
            Node::Text(text) => match scan_text_node(text) {
                Some(replacement) => {
                    rendered += replacement
                        .iter()
                        .filter(|n| matches!(n, Node::Element(_)))
                        .count();
                    let count = replacement.len();
                    children.splice(idx..idx + 1, replacement);
                    idx += count;
                }
                None => idx += 1,
            },
        }
    }
    rendered
}

/// Whether the scanner may descend into an element.
fn scannable(el: &Element) -> bool {
    !(el.tag == "script"
        || el.tag == "style"
        || el.is_editable()
        || el.has_class(RENDERED_CLASS)
        || el.attr(SOURCE_ATTR).is_some())
}

/// Split a text node into literal pieces and rendered math nodes.
/// Returns None when the text contains no math spans.
fn scan_text_node(text: &str) -> Option<Vec<Node>> {
    let block = find_block_spans(text);
    let mut nodes = Vec::new();
    let mut found = false;
    let mut last = 0;

    for span in &block {
        if span.start > last {
            push_inline(&mut nodes, &text[last..span.start], &mut found);
        }
        nodes.push(Node::Element(render_math_node(
            span.source(text),
            span.body,
            span.delimiter,
        )));
        found = true;
        last = span.end;
    }
    if last < text.len() {
        push_inline(&mut nodes, &text[last..], &mut found);
    }

    found.then_some(nodes)
}

fn push_inline(nodes: &mut Vec<Node>, literal: &str, found: &mut bool) {
    let mut last = 0;
    for span in find_inline_spans(literal) {
        if span.start > last {
            nodes.push(Node::text(&literal[last..span.start]));
        }
        nodes.push(Node::Element(render_math_node(
            span.source(literal),
            span.body,
            span.delimiter,
        )));
        *found = true;
        last = span.end;
    }
    if last < literal.len() {
        nodes.push(Node::text(&literal[last..]));
    }
}

/// The write/preview pipeline: parse the stored markup, render every math
/// span in place, and serialize back to a markup string.
pub fn render_preview(markup: &str) -> String {
    let mut fragment = parse_fragment(markup);
    let rendered = process_fragment(&mut fragment);
    trace!(rendered, "preview pass complete");
    serialize_fragment(&fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pass_finds_both_kinds() {
        let text = r"a \[x\] b $$y$$ c";
        let spans = find_block_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].body, "x");
        assert_eq!(spans[0].delimiter, Delimiter::BracketBlock);
        assert_eq!(spans[1].body, "y");
        assert_eq!(spans[1].delimiter, Delimiter::DollarBlock);
    }

    #[test]
    fn block_spans_may_contain_newlines_and_dollars() {
        let text = "\\[\na = $1\n\\]";
        let spans = find_block_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].body, "\na = $1\n");
    }

    #[test]
    fn block_before_inline_precedence() {
        // \[x\] must be consumed by the block pass even with stray dollars.
        let text = r"pay $ now \[x\]";
        let block = find_block_spans(text);
        assert_eq!(block.len(), 1);
        assert_eq!(block[0].source(text), r"\[x\]");
    }

    #[test]
    fn inline_pass_finds_both_kinds() {
        let text = r"a \(x\) b $y^2$ c";
        let spans = find_inline_spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].body, "x");
        assert_eq!(spans[1].body, "y^2");
    }

    #[test]
    fn inline_dollar_rejects_newline() {
        let spans = find_inline_spans("$a\nb$");
        assert!(spans.is_empty());
    }

    #[test]
    fn currency_guard() {
        assert!(find_inline_spans("Price: $5$ only").is_empty());
        assert!(find_inline_spans("Price: $10.25$ only").is_empty());
        // Not a bare number: renders.
        assert_eq!(find_inline_spans("$5x$").len(), 1);
        assert_eq!(find_inline_spans("$x$").len(), 1);
    }

    #[test]
    fn mixed_currency_spans_each_stay_literal() {
        let spans = find_inline_spans("$5$ and $10$");
        assert!(spans.is_empty());
    }

    #[test]
    fn substitute_renders_and_preserves_source() {
        let out = substitute_math(r"see $x^2$ here");
        assert!(out.contains("math-render"));
        assert!(out.contains(r#"data-math-source="$x^2$""#));
        assert!(out.starts_with("see "));
        assert!(out.ends_with(" here"));
    }

    #[test]
    fn substitute_leaves_currency_alone() {
        let text = "Price: $5$ only";
        assert_eq!(substitute_math(text), text);
    }

    #[test]
    fn malformed_span_renders_error_marker_without_aborting() {
        let out = substitute_math(r"$\frac{a$ then $x^2$");
        assert!(out.contains("math-error"));
        // The sibling span still rendered.
        assert!(out.contains(r#"data-math-source="$x^2$""#));
    }

    #[test]
    fn tree_mode_scans_text_nodes() {
        let mut frag = parse_fragment(r"<p>inline $x^2$ math</p>");
        let rendered = process_fragment(&mut frag);
        assert_eq!(rendered, 1);
        let html = serialize_fragment(&frag);
        assert!(html.contains(r#"data-math-source="$x^2$""#));
        assert!(html.contains("<math"));
    }

    #[test]
    fn tree_mode_skips_rendered_nodes() {
        let src = r#"<span class="math-render math-inline" data-math-source="$x$">x</span>"#;
        let mut frag = parse_fragment(src);
        assert_eq!(process_fragment(&mut frag), 0);
        assert_eq!(serialize_fragment(&frag), src);
    }

    #[test]
    fn tree_mode_skips_editable_and_inputs() {
        let src = r#"<div contenteditable="true">$x^2$</div><textarea>$y$</textarea>"#;
        let mut frag = parse_fragment(src);
        assert_eq!(process_fragment(&mut frag), 0);
    }

    #[test]
    fn tree_mode_skips_script_and_style() {
        let src = "<script>let a = $x$;</script><style>.a {}</style>";
        let mut frag = parse_fragment(src);
        assert_eq!(process_fragment(&mut frag), 0);
    }

    #[test]
    fn preview_round_trips_source_attribute() {
        let out = render_preview(r"<p>\(a+b\)</p>");
        let frag = parse_fragment(&out);
        let p = frag.children[0].as_element().unwrap();
        let span = p.children[0].as_element().unwrap();
        assert_eq!(span.attr(crate::math::SOURCE_ATTR), Some(r"\(a+b\)"));
    }

    #[test]
    fn preview_is_stable_once_rendered() {
        let once = render_preview(r"<p>$x^2$</p>");
        let twice = render_preview(&once);
        assert_eq!(once, twice);
    }
}
