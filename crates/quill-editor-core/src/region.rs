//! The editable region: an owned markup tree plus selection state.
//!
//! All formatting is modeled as explicit operations over the owned tree
//! (split/wrap/unwrap over character ranges) with explicit pre/post
//! selection mapping, instead of delegating to an ambient platform
//! command processor.
//!
//! Offsets throughout are character offsets into the region's visible
//! text projection. Rendered-math nodes, editable controls, and void
//! elements are atomic: they are never split and their interiors are
//! never restyled.

use quill_dom::{
    Element, Fragment, Node, StyleSignature, is_formatting_wrapper, parse_fragment,
    serialize_fragment,
};
use quill_render::RENDERED_CLASS;
use smol_str::SmolStr;

use crate::types::Selection;

/// Tags treated as block-level containers for alignment/heading/list
/// operations.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote", "pre",
    "figure",
];

/// An inline style a toggle command can apply or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineStyle {
    Bold,
    Italic,
    Underline,
}

impl InlineStyle {
    /// The style declaration written onto new wrapper spans.
    fn declaration(&self) -> &'static str {
        match self {
            Self::Bold => "font-weight: bold",
            Self::Italic => "font-style: italic",
            Self::Underline => "text-decoration: underline",
        }
    }

    /// Whether a resolved signature carries this style.
    fn present(&self, sig: &StyleSignature) -> bool {
        match self {
            Self::Bold => matches!(sig.font_weight.as_deref(), Some("bold") | Some("700")),
            Self::Italic => sig.font_style.as_deref() == Some("italic"),
            Self::Underline => sig
                .text_decoration
                .as_deref()
                .is_some_and(|v| v.split_ascii_whitespace().any(|p| p == "underline")),
        }
    }

    /// Remove this style from a signature.
    fn clear(&self, sig: &mut StyleSignature) {
        match self {
            Self::Bold => sig.font_weight = None,
            Self::Italic => sig.font_style = None,
            Self::Underline => sig.text_decoration = None,
        }
    }
}

fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Atomic elements are never split, wrapped, or descended into by
/// formatting operations.
fn is_atomic(el: &Element) -> bool {
    el.is_void()
        || el.has_class(RENDERED_CLASS)
        || el.is_editable()
        || el.tag == "script"
        || el.tag == "style"
}

/// Serialize a signature back to a `style` attribute value.
fn signature_style(sig: &StyleSignature) -> String {
    let mut decls: Vec<String> = Vec::new();
    let mut push = |prop: &str, value: &Option<SmolStr>| {
        if let Some(v) = value {
            decls.push(format!("{prop}: {v}"));
        }
    };
    push("font-family", &sig.font_family);
    push("color", &sig.color);
    push("background-color", &sig.background);
    push("font-weight", &sig.font_weight);
    push("font-style", &sig.font_style);
    push("text-decoration", &sig.text_decoration);
    decls.join("; ")
}

/// Set one declaration in an element's `style` attribute, replacing any
/// existing declaration for the same property.
fn set_style_decl(el: &mut Element, prop: &str, value: &str) {
    let mut decls: Vec<String> = el
        .attr("style")
        .map(|style| {
            style
                .split(';')
                .filter_map(|decl| {
                    let decl = decl.trim();
                    if decl.is_empty() {
                        return None;
                    }
                    let keep = decl
                        .split_once(':')
                        .map(|(p, _)| !p.trim().eq_ignore_ascii_case(prop))
                        .unwrap_or(false);
                    keep.then(|| decl.to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    decls.push(format!("{prop}: {value}"));
    el.set_attr("style", decls.join("; "));
}

/// Split a sibling list at a character offset, splitting text nodes and
/// cloning element shells as needed. Atomic elements straddling the
/// split point go to the left side whole.
fn split_nodes(nodes: Vec<Node>, at: usize) -> (Vec<Node>, Vec<Node>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut pos = 0;
    for node in nodes {
        let len = node.text_len();
        if pos + len <= at {
            pos += len;
            left.push(node);
        } else if pos >= at {
            right.push(node);
        } else {
            match node {
                Node::Text(s) => {
                    let split = at - pos;
                    let byte = s
                        .char_indices()
                        .nth(split)
                        .map(|(i, _)| i)
                        .unwrap_or(s.len());
                    left.push(Node::text(&s[..byte]));
                    right.push(Node::text(&s[byte..]));
                }
                Node::Element(el) if is_atomic(&el) => {
                    left.push(Node::Element(el));
                }
                Node::Element(el) => {
                    let (lc, rc) = split_nodes(el.children, at - pos);
                    if !lc.is_empty() {
                        left.push(Node::Element(Element {
                            tag: el.tag.clone(),
                            attrs: el.attrs.clone(),
                            children: lc,
                        }));
                    }
                    if !rc.is_empty() {
                        right.push(Node::Element(Element {
                            tag: el.tag,
                            attrs: el.attrs,
                            children: rc,
                        }));
                    }
                }
            }
            pos += len;
        }
    }
    (left, right)
}

/// Join two sibling lists, merging the nodes facing each other across
/// the seam when they are clones of one split element (same tag and
/// attrs) or both text.
fn merge_seam(left: &mut Vec<Node>, mut right: Vec<Node>) {
    let mergeable = match (left.last(), right.first()) {
        (Some(Node::Text(_)), Some(Node::Text(_))) => true,
        (Some(Node::Element(a)), Some(Node::Element(b))) => {
            a.tag == b.tag && a.attrs == b.attrs && !is_atomic(b)
        }
        _ => false,
    };
    if mergeable {
        match (left.last_mut(), right.remove(0)) {
            (Some(Node::Text(a)), Node::Text(b)) => a.push_str(&b),
            (Some(Node::Element(a)), Node::Element(b)) => {
                merge_seam(&mut a.children, b.children)
            }
            _ => unreachable!(),
        }
    }
    left.extend(right);
}

/// A mutable tree of markup nodes owned by one editor instance for its
/// lifetime, with the current selection and focus state.
#[derive(Debug, Default)]
pub struct EditorRegion {
    tree: Fragment,
    selection: Option<Selection>,
    focused: bool,
}

impl EditorRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a region from a markup string.
    pub fn from_markup(markup: &str) -> Self {
        Self {
            tree: parse_fragment(markup),
            selection: None,
            focused: false,
        }
    }

    /// Serialize the region's content back to markup.
    pub fn markup(&self) -> String {
        serialize_fragment(&self.tree)
    }

    /// Replace the region's content. The selection is clamped to the
    /// new text length.
    pub fn set_markup(&mut self, markup: &str) {
        self.tree = parse_fragment(markup);
        let max = self.text_len();
        self.selection = self.selection.map(|sel| sel.clamp(max));
    }

    pub fn tree(&self) -> &Fragment {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Fragment {
        &mut self.tree
    }

    /// The region's visible text projection.
    pub fn text(&self) -> String {
        self.tree.text()
    }

    /// Visible text length in chars.
    pub fn text_len(&self) -> usize {
        self.tree.text_len()
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.selection = None;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set the selection, clamped to the current text length. Implies
    /// focus.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        let max = self.text_len();
        self.selection = selection.map(|sel| sel.clamp(max));
        if self.selection.is_some() {
            self.focused = true;
        }
    }

    /// Restore a previously captured selection if it still resolves
    /// within the region, otherwise fall back to refocusing without a
    /// selection. The region never loses focus here.
    pub fn restore_selection(&mut self, saved: Option<Selection>) {
        self.focused = true;
        let max = self.text_len();
        self.selection = match saved {
            Some(sel) if sel.start() <= max => Some(sel.clamp(max)),
            _ => None,
        };
    }

    // === Inline styling ===

    /// Whether every visible char in the range carries the style, from
    /// the char's own wrappers or an ancestor. Empty ranges are never
    /// "styled".
    pub(crate) fn range_styled(&self, start: usize, end: usize, style: InlineStyle) -> bool {
        if start >= end {
            return false;
        }
        fn walk(
            nodes: &[Node],
            pos: &mut usize,
            start: usize,
            end: usize,
            inherited: bool,
            style: InlineStyle,
        ) -> bool {
            for node in nodes {
                let len = node.text_len();
                let overlap = *pos < end && *pos + len > start;
                match node {
                    Node::Text(_) => {
                        if overlap && !inherited {
                            return false;
                        }
                        *pos += len;
                    }
                    Node::Element(el) => {
                        if is_atomic(el) {
                            // Atomic interiors are not user text.
                            *pos += len;
                        } else {
                            let here = inherited || style.present(&StyleSignature::resolve(el));
                            if overlap && !walk(&el.children, pos, start, end, here, style) {
                                return false;
                            }
                            if !overlap {
                                *pos += len;
                            }
                        }
                    }
                }
                if *pos >= end {
                    break;
                }
            }
            true
        }
        let mut pos = 0;
        walk(&self.tree.children, &mut pos, start, end, false, style)
    }

    /// Wrap every text segment in the range in a styled span. Existing
    /// structure is preserved; the normalizer merges the resulting
    /// sibling runs afterwards.
    pub(crate) fn apply_inline(&mut self, start: usize, end: usize, style: InlineStyle) {
        fn wrap(nodes: &mut Vec<Node>, pos: &mut usize, start: usize, end: usize, decl: &str) {
            let mut i = 0;
            while i < nodes.len() {
                let len = nodes[i].text_len();
                let node_start = *pos;
                let node_end = node_start + len;
                let overlaps = node_start < end && node_end > start;
                match &mut nodes[i] {
                    Node::Text(s) if overlaps => {
                        let text = std::mem::take(s);
                        let rel_start = start.saturating_sub(node_start);
                        let rel_end = (end - node_start).min(len);
                        let byte_at = |n: usize| {
                            text.char_indices()
                                .nth(n)
                                .map(|(b, _)| b)
                                .unwrap_or(text.len())
                        };
                        let (b_start, b_end) = (byte_at(rel_start), byte_at(rel_end));
                        let mut replacement = Vec::with_capacity(3);
                        if b_start > 0 {
                            replacement.push(Node::text(&text[..b_start]));
                        }
                        replacement.push(Node::Element(
                            Element::new("span")
                                .with_attr("style", decl)
                                .with_child(Node::text(&text[b_start..b_end])),
                        ));
                        if b_end < text.len() {
                            replacement.push(Node::text(&text[b_end..]));
                        }
                        let added = replacement.len();
                        nodes.splice(i..=i, replacement);
                        i += added;
                    }
                    Node::Element(el) if overlaps && !is_atomic(el) => {
                        wrap(&mut el.children, pos, start, end, decl);
                        i += 1;
                        continue;
                    }
                    _ => {
                        i += 1;
                    }
                }
                *pos = node_end;
                if *pos >= end {
                    break;
                }
            }
        }
        let mut pos = 0;
        wrap(
            &mut self.tree.children,
            &mut pos,
            start,
            end,
            style.declaration(),
        );
    }

    /// Remove a style from every wrapper covering the range. Wrappers
    /// straddling the range boundary are split first so only the
    /// in-range piece loses the style.
    pub(crate) fn remove_inline(&mut self, start: usize, end: usize, style: InlineStyle) {
        fn strip(nodes: &mut Vec<Node>, pos: &mut usize, start: usize, end: usize, style: InlineStyle) {
            let mut i = 0;
            while i < nodes.len() {
                let len = nodes[i].text_len();
                let node_start = *pos;
                let node_end = node_start + len;
                if node_start >= end {
                    break;
                }
                let overlaps = node_start < end && node_end > start;
                let Node::Element(el) = &mut nodes[i] else {
                    *pos = node_end;
                    i += 1;
                    continue;
                };
                if !overlaps || is_atomic(el) {
                    *pos = node_end;
                    i += 1;
                    continue;
                }
                let styled_wrapper =
                    is_formatting_wrapper(el) && style.present(&StyleSignature::resolve(el));
                let fully_inside = node_start >= start && node_end <= end;
                if styled_wrapper && !fully_inside {
                    // Split the wrapper at the range boundary, then
                    // revisit the pieces.
                    let owned = match std::mem::replace(&mut nodes[i], Node::Text(String::new())) {
                        Node::Element(el) => el,
                        Node::Text(_) => unreachable!(),
                    };
                    let boundary = if node_start < start { start } else { end };
                    let cut = boundary - node_start;
                    let (lc, mut rc) = split_nodes(owned.children, cut);
                    if lc.is_empty() || rc.is_empty() {
                        // The boundary landed inside an atomic child,
                        // which cannot be split: re-splitting at the
                        // same cut would reproduce the same wrapper.
                        // Snap to the start of the child that swallowed
                        // the cut so preceding siblings still split
                        // off; if that child leads, keep the wrapper
                        // whole and descend. The atomic child keeps the
                        // style either way.
                        let mut children = lc;
                        children.append(&mut rc);
                        let mut snap = 0;
                        for child in &children {
                            let child_len = child.text_len();
                            if snap + child_len > cut {
                                break;
                            }
                            snap += child_len;
                        }
                        if snap > 0 {
                            let (lc, rc) = split_nodes(children, snap);
                            let mut pieces = Vec::with_capacity(2);
                            for half in [lc, rc] {
                                pieces.push(Node::Element(Element {
                                    tag: owned.tag.clone(),
                                    attrs: owned.attrs.clone(),
                                    children: half,
                                }));
                            }
                            nodes.splice(i..=i, pieces);
                            continue;
                        }
                        let mut restored = Element {
                            tag: owned.tag,
                            attrs: owned.attrs,
                            children,
                        };
                        strip(&mut restored.children, pos, start, end, style);
                        nodes[i] = Node::Element(restored);
                        *pos = node_end;
                        i += 1;
                        continue;
                    }
                    let mut pieces = Vec::with_capacity(2);
                    for half in [lc, rc] {
                        pieces.push(Node::Element(Element {
                            tag: owned.tag.clone(),
                            attrs: owned.attrs.clone(),
                            children: half,
                        }));
                    }
                    nodes.splice(i..=i, pieces);
                    continue;
                }
                if styled_wrapper && fully_inside {
                    let mut sig = StyleSignature::resolve(el);
                    style.clear(&mut sig);
                    if sig.is_plain() {
                        // Nothing left on the wrapper: unwrap it. The
                        // spliced children keep the same offsets, so
                        // rescan from the same index.
                        let el = match std::mem::replace(&mut nodes[i], Node::Text(String::new()))
                        {
                            Node::Element(el) => el,
                            Node::Text(_) => unreachable!(),
                        };
                        nodes.splice(i..=i, el.children);
                        continue;
                    }
                    el.tag = SmolStr::new_static("span");
                    el.set_attr("style", signature_style(&sig));
                }
                strip(&mut el.children, pos, start, end, style);
                *pos = node_end;
                i += 1;
            }
        }
        let mut pos = 0;
        strip(&mut self.tree.children, &mut pos, start, end, style);
    }

    // === Block operations ===

    /// Indices of the top-level children overlapping the selection,
    /// wrapping any adjacent non-block children into a `<div>` first so
    /// every target is a block element. Returns a child index range.
    fn block_targets(&mut self, start: usize, end: usize) -> std::ops::Range<usize> {
        let total = self.tree.text_len();
        let start = start.min(total);
        let end = end.min(total).max(start);
        // Find overlapping children (a collapsed selection hits the
        // child containing the offset, or the last child at the end).
        let mut first = None;
        let mut last = 0;
        let mut pos = 0;
        for (i, child) in self.tree.children.iter().enumerate() {
            let len = child.text_len();
            let hit = if start == end {
                start >= pos && (start < pos + len || (start == pos + len && pos + len == total))
            } else {
                pos < end && pos + len > start
            };
            if hit {
                first.get_or_insert(i);
                last = i;
            }
            pos += len;
        }
        let Some(first) = first else {
            // Empty region or selection past all content: wrap
            // everything (possibly nothing) in one block.
            let children = std::mem::take(&mut self.tree.children);
            self.tree
                .children
                .push(Node::Element(Element::new("div").with_children(children)));
            return 0..1;
        };
        // Group consecutive non-block children around the hit range
        // into divs so each target is a block.
        let mut i = first;
        let mut end_idx = last + 1;
        while i < end_idx {
            let is_block = self.tree.children[i]
                .as_element()
                .is_some_and(|el| is_block_tag(&el.tag));
            if is_block {
                i += 1;
                continue;
            }
            // Extend the group over following non-block siblings within
            // the target range.
            let mut j = i + 1;
            while j < end_idx
                && !self.tree.children[j]
                    .as_element()
                    .is_some_and(|el| is_block_tag(&el.tag))
            {
                j += 1;
            }
            let group: Vec<Node> = self.tree.children.drain(i..j).collect();
            self.tree
                .children
                .insert(i, Node::Element(Element::new("div").with_children(group)));
            end_idx -= j - i - 1;
            i += 1;
        }
        first..end_idx
    }

    /// Set `text-align` on every block overlapping the selection.
    pub(crate) fn set_alignment(&mut self, start: usize, end: usize, value: &str) {
        let targets = self.block_targets(start, end);
        for child in &mut self.tree.children[targets] {
            if let Some(el) = child.as_element_mut() {
                set_style_decl(el, "text-align", value);
            }
        }
    }

    /// Convert every block overlapping the selection to the given tag
    /// (a heading level or `p`). List containers are left alone.
    pub(crate) fn set_block_tag(&mut self, start: usize, end: usize, tag: &str) {
        let targets = self.block_targets(start, end);
        for child in &mut self.tree.children[targets] {
            if let Some(el) = child.as_element_mut() {
                if el.tag == "ul" || el.tag == "ol" {
                    continue;
                }
                el.tag = SmolStr::new(tag);
            }
        }
    }

    /// Toggle a list over the blocks overlapping the selection: wrap
    /// them into one list container, or unwrap a matching container
    /// back into paragraphs.
    pub(crate) fn toggle_list(&mut self, start: usize, end: usize, list_tag: &str) {
        let targets = self.block_targets(start, end);
        // Single matching container under the selection: unwrap.
        if targets.len() == 1 {
            let i = targets.start;
            if self.tree.children[i]
                .as_element()
                .is_some_and(|el| el.tag == list_tag)
            {
                let el = match self.tree.children.remove(i) {
                    Node::Element(el) => el,
                    Node::Text(_) => return,
                };
                let paragraphs: Vec<Node> = el
                    .children
                    .into_iter()
                    .map(|item| match item {
                        Node::Element(li) if li.tag == "li" => {
                            Node::Element(Element::new("p").with_children(li.children))
                        }
                        other => other,
                    })
                    .collect();
                self.tree.children.splice(i..i, paragraphs);
                return;
            }
        }
        let i = targets.start;
        let blocks: Vec<Node> = self.tree.children.drain(targets).collect();
        let items: Vec<Node> = blocks
            .into_iter()
            .flat_map(|block| match block {
                Node::Element(el) if el.tag == "li" => vec![Node::Element(el)],
                Node::Element(el) if el.tag == "ul" || el.tag == "ol" => {
                    // Splice an existing list's items straight into the
                    // new container; rewrapping them would nest `li`s.
                    el.children
                }
                Node::Element(el) => vec![Node::Element(Element {
                    tag: SmolStr::new_static("li"),
                    attrs: Vec::new(),
                    children: el.children,
                })],
                text @ Node::Text(_) => {
                    vec![Node::Element(Element::new("li").with_child(text))]
                }
            })
            .collect();
        self.tree.children.insert(
            i,
            Node::Element(Element {
                tag: SmolStr::new(list_tag),
                attrs: Vec::new(),
                children: items,
            }),
        );
    }

    // === Insertion / deletion ===

    /// Delete the visible text range. Atomic nodes straddling the start
    /// boundary are kept whole. Element shells split by the deletion
    /// are rejoined at the seam so an inline delete does not split its
    /// paragraph in two.
    pub(crate) fn delete_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let children = std::mem::take(&mut self.tree.children);
        let (mut left, rest) = split_nodes(children, start);
        let (_, right) = split_nodes(rest, end - start);
        merge_seam(&mut left, right);
        self.tree.children = left;
    }

    /// Insert nodes at a character offset. Insertion descends to the
    /// deepest node containing the offset, caret-style: an offset at
    /// the end of a paragraph inserts inside that paragraph, not after
    /// it.
    pub(crate) fn insert_at(&mut self, offset: usize, nodes: Vec<Node>) {
        fn insert_into(children: &mut Vec<Node>, offset: usize, insert: Vec<Node>) {
            let mut pos = 0;
            for i in 0..children.len() {
                let len = children[i].text_len();
                if pos + len < offset {
                    pos += len;
                    continue;
                }
                match &mut children[i] {
                    Node::Text(s) => {
                        let rel = offset - pos;
                        let byte = s
                            .char_indices()
                            .nth(rel)
                            .map(|(b, _)| b)
                            .unwrap_or(s.len());
                        let tail = s.split_off(byte);
                        let head = std::mem::take(s);
                        let mut replacement = Vec::with_capacity(insert.len() + 2);
                        if !head.is_empty() {
                            replacement.push(Node::Text(head));
                        }
                        replacement.extend(insert);
                        if !tail.is_empty() {
                            replacement.push(Node::Text(tail));
                        }
                        children.splice(i..=i, replacement);
                    }
                    Node::Element(el) if !is_atomic(el) => {
                        insert_into(&mut el.children, offset - pos, insert);
                    }
                    Node::Element(_) => {
                        let at = if offset == pos { i } else { i + 1 };
                        children.splice(at..at, insert);
                    }
                }
                return;
            }
            children.extend(insert);
        }
        insert_into(&mut self.tree.children, offset, nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(markup: &str) -> EditorRegion {
        EditorRegion::from_markup(markup)
    }

    #[test]
    fn test_markup_roundtrip() {
        let r = region("<p>hello <b>world</b></p>");
        assert_eq!(r.markup(), "<p>hello <b>world</b></p>");
        assert_eq!(r.text(), "hello world");
        assert_eq!(r.text_len(), 11);
    }

    #[test]
    fn test_split_nodes_text() {
        let (l, r) = split_nodes(vec![Node::text("hello world")], 5);
        assert_eq!(l, vec![Node::text("hello")]);
        assert_eq!(r, vec![Node::text(" world")]);
    }

    #[test]
    fn test_split_nodes_element() {
        let nodes = vec![Node::Element(
            Element::new("b").with_child(Node::text("abcd")),
        )];
        let (l, r) = split_nodes(nodes, 2);
        assert_eq!(
            l,
            vec![Node::Element(Element::new("b").with_child(Node::text("ab")))]
        );
        assert_eq!(
            r,
            vec![Node::Element(Element::new("b").with_child(Node::text("cd")))]
        );
    }

    #[test]
    fn test_apply_inline_wraps_middle() {
        let mut r = region("hello world");
        r.apply_inline(6, 11, InlineStyle::Bold);
        assert_eq!(
            r.markup(),
            "hello <span style=\"font-weight: bold\">world</span>"
        );
        assert_eq!(r.text(), "hello world");
    }

    #[test]
    fn test_apply_inline_descends_into_elements() {
        let mut r = region("<p>one two</p>");
        r.apply_inline(0, 3, InlineStyle::Italic);
        assert_eq!(
            r.markup(),
            "<p><span style=\"font-style: italic\">one</span> two</p>"
        );
    }

    #[test]
    fn test_apply_inline_skips_rendered_math() {
        let mut r = region("a<span class=\"math-render\">x</span>b");
        r.apply_inline(0, 3, InlineStyle::Bold);
        let markup = r.markup();
        assert!(markup.contains("<span class=\"math-render\">x</span>"));
        assert!(markup.contains("font-weight: bold"));
    }

    #[test]
    fn test_range_styled() {
        let r = region("<b>ab</b>cd");
        assert!(r.range_styled(0, 2, InlineStyle::Bold));
        assert!(!r.range_styled(0, 4, InlineStyle::Bold));
        assert!(!r.range_styled(2, 4, InlineStyle::Bold));
        assert!(!r.range_styled(1, 1, InlineStyle::Bold));
    }

    #[test]
    fn test_range_styled_inherited() {
        let r = region("<span style=\"font-weight: bold\">a<i>b</i></span>");
        assert!(r.range_styled(0, 2, InlineStyle::Bold));
        assert!(r.range_styled(1, 2, InlineStyle::Italic));
        assert!(!r.range_styled(0, 2, InlineStyle::Italic));
    }

    #[test]
    fn test_remove_inline_unwraps_plain_wrapper() {
        let mut r = region("<span style=\"font-weight: bold\">ab</span>");
        r.remove_inline(0, 2, InlineStyle::Bold);
        assert_eq!(r.markup(), "ab");
    }

    #[test]
    fn test_remove_inline_keeps_other_styles() {
        let mut r = region("<span style=\"color: red; font-weight: bold\">ab</span>");
        r.remove_inline(0, 2, InlineStyle::Bold);
        assert_eq!(r.markup(), "<span style=\"color: red\">ab</span>");
        assert!(!r.range_styled(0, 2, InlineStyle::Bold));
    }

    #[test]
    fn test_remove_inline_splits_partial_wrapper() {
        let mut r = region("<b>abcd</b>");
        r.remove_inline(0, 2, InlineStyle::Bold);
        assert!(r.range_styled(2, 4, InlineStyle::Bold));
        assert!(!r.range_styled(0, 2, InlineStyle::Bold));
        assert_eq!(r.text(), "abcd");
    }

    #[test]
    fn test_remove_inline_boundary_inside_rendered_math() {
        // The rendered node cannot be split, so the wrapper stays on it.
        let markup = "<b><span class=\"math-render math-inline\" data-math-source=\"$xyzzy$\">xyzzy</span></b>tail";
        let mut r = region(markup);
        r.remove_inline(0, 3, InlineStyle::Bold);
        assert_eq!(r.markup(), markup);
    }

    #[test]
    fn test_remove_inline_splits_off_siblings_of_rendered_math() {
        let rendered =
            "<span class=\"math-render math-inline\" data-math-source=\"$m$\">mm</span>";
        let mut r = region(&format!("<b>ab{rendered}</b>tail"));
        r.remove_inline(0, 3, InlineStyle::Bold);
        assert_eq!(r.markup(), format!("ab<b>{rendered}</b>tail"));
    }

    #[test]
    fn test_set_alignment() {
        let mut r = region("<p>one</p><p>two</p>");
        r.set_alignment(0, 6, "center");
        assert_eq!(
            r.markup(),
            "<p style=\"text-align: center\">one</p><p style=\"text-align: center\">two</p>"
        );
    }

    #[test]
    fn test_set_alignment_wraps_bare_text() {
        let mut r = region("loose text");
        r.set_alignment(0, 5, "right");
        assert_eq!(r.markup(), "<div style=\"text-align: right\">loose text</div>");
    }

    #[test]
    fn test_alignment_replaces_previous() {
        let mut r = region("<p style=\"text-align: left\">one</p>");
        r.set_alignment(0, 3, "center");
        assert_eq!(r.markup(), "<p style=\"text-align: center\">one</p>");
    }

    #[test]
    fn test_set_block_tag_heading() {
        let mut r = region("<p>title</p>");
        r.set_block_tag(0, 5, "h2");
        assert_eq!(r.markup(), "<h2>title</h2>");
        r.set_block_tag(0, 5, "p");
        assert_eq!(r.markup(), "<p>title</p>");
    }

    #[test]
    fn test_toggle_list_wrap_and_unwrap() {
        let mut r = region("<p>one</p><p>two</p>");
        r.toggle_list(0, 6, "ul");
        assert_eq!(r.markup(), "<ul><li>one</li><li>two</li></ul>");
        r.toggle_list(0, 6, "ul");
        assert_eq!(r.markup(), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_toggle_list_folds_existing_list_items_flat() {
        let mut r = region("<p>intro</p><ul><li>one</li><li>two</li></ul>");
        r.toggle_list(0, 11, "ul");
        assert_eq!(
            r.markup(),
            "<ul><li>intro</li><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn test_toggle_list_converts_list_kind() {
        let mut r = region("<ol><li>one</li><li>two</li></ol>");
        r.toggle_list(0, 6, "ul");
        assert_eq!(r.markup(), "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_delete_range() {
        let mut r = region("<p>hello world</p>");
        r.delete_range(5, 11);
        assert_eq!(r.text(), "hello");
        assert_eq!(r.markup(), "<p>hello</p>");
    }

    #[test]
    fn test_insert_at_splits_boundary() {
        let mut r = region("<p>ab</p>");
        r.insert_at(1, vec![Node::text("X")]);
        assert_eq!(r.text(), "aXb");
    }

    #[test]
    fn test_selection_clamped_on_set_markup() {
        let mut r = region("hello world");
        r.set_selection(Some(Selection::new(0, 11)));
        r.set_markup("hi");
        assert_eq!(r.selection(), Some(Selection::new(0, 2)));
    }

    #[test]
    fn test_restore_selection_fallback() {
        let mut r = region("hello");
        r.restore_selection(Some(Selection::new(2, 4)));
        assert_eq!(r.selection(), Some(Selection::new(2, 4)));
        assert!(r.is_focused());

        let mut r = region("hi");
        r.restore_selection(Some(Selection::new(10, 12)));
        assert_eq!(r.selection(), None);
        assert!(r.is_focused());
    }
}
