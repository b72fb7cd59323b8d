//! Markup serialization.
//!
//! Produces the canonical form of a tree: double-quoted attributes in
//! source order, void elements without close tags, text and attribute
//! values escaped. `parse_fragment(serialize_fragment(t)) == t` for any
//! tree the editor produces.

use crate::escape::{escape_attr, escape_text};
use crate::node::{Element, Fragment, Node, RAW_TEXT_TAGS};

/// Serialize a fragment to a markup string.
pub fn serialize_fragment(fragment: &Fragment) -> String {
    let mut out = String::new();
    for node in &fragment.children {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => escape_text(out, text),
        Node::Element(el) => write_element(out, el),
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            escape_attr(out, value);
            out.push('"');
        }
    }
    out.push('>');

    if el.is_void() {
        return;
    }

    if RAW_TEXT_TAGS.contains(&el.tag.as_str()) {
        // Raw text children are emitted verbatim.
        for child in &el.children {
            if let Node::Text(text) = child {
                out.push_str(text);
            }
        }
    } else {
        for child in &el.children {
            write_node(out, child);
        }
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}
