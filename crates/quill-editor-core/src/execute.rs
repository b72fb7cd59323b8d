//! Command execution with selection capture and restore.
//!
//! `execute_command` is the central dispatch point for all formatting
//! operations. Every invocation follows the same sequence: focus the
//! region, capture the selection, apply the operation to the tree,
//! normalize, then restore the selection (remapped for insertions) or
//! fall back to refocusing if the saved range no longer resolves.

use quill_dom::{Element, Node, parse_fragment};
use tracing::debug;

use crate::actions::{Command, ImagePosition};
use crate::normalize::normalize;
use crate::region::{EditorRegion, InlineStyle};
use crate::types::Selection;

/// Execute a formatting command on a region.
///
/// Returns true if the command was applied. A command that needs a
/// selection but has none, or an unsupported heading level, returns
/// false without touching the tree. The region keeps focus either way.
pub fn execute_command(region: &mut EditorRegion, command: &Command) -> bool {
    region.focus();
    let saved = region.selection();
    if command.needs_selection() && saved.is_none_or(|sel| sel.is_collapsed()) {
        // Inline toggles on a collapsed selection are no-ops; the
        // region stays focused.
        return false;
    }

    let applied = match command {
        Command::Bold => toggle_inline(region, saved, InlineStyle::Bold),
        Command::Italic => toggle_inline(region, saved, InlineStyle::Italic),
        Command::Underline => toggle_inline(region, saved, InlineStyle::Underline),
        Command::Align(alignment) => {
            let (start, end) = selection_bounds(region, saved);
            region.set_alignment(start, end, alignment.css_value());
            region.restore_selection(saved);
            true
        }
        Command::Heading(level) => {
            if !(1..=6).contains(level) {
                debug!(level, "ignoring out-of-range heading level");
                return false;
            }
            let (start, end) = selection_bounds(region, saved);
            region.set_block_tag(start, end, &format!("h{level}"));
            region.restore_selection(saved);
            true
        }
        Command::Paragraph => {
            let (start, end) = selection_bounds(region, saved);
            region.set_block_tag(start, end, "p");
            region.restore_selection(saved);
            true
        }
        Command::List(kind) => {
            let (start, end) = selection_bounds(region, saved);
            region.toggle_list(start, end, kind.tag());
            region.restore_selection(saved);
            true
        }
        Command::InsertImage { url, position } => {
            insert_nodes(region, saved, vec![Node::Element(image_element(url, *position))])
        }
        Command::InsertLink { url, text } => {
            let text = if text.is_empty() { url.as_str() } else { text };
            let link = Element::new("a")
                .with_attr("href", url.clone())
                .with_child(Node::text(text));
            insert_nodes(region, saved, vec![Node::Element(link)])
        }
        Command::InsertHtml { markup } => {
            insert_nodes(region, saved, parse_fragment(markup).children)
        }
    };

    if applied {
        normalize(region.tree_mut());
    }
    applied
}

fn selection_bounds(region: &EditorRegion, saved: Option<Selection>) -> (usize, usize) {
    match saved {
        Some(sel) => (sel.start(), sel.end()),
        None => {
            let end = region.text_len();
            (end, end)
        }
    }
}

fn toggle_inline(
    region: &mut EditorRegion,
    saved: Option<Selection>,
    style: InlineStyle,
) -> bool {
    let Some(sel) = saved else {
        return false;
    };
    let (start, end) = (sel.start(), sel.end());
    if region.range_styled(start, end, style) {
        region.remove_inline(start, end, style);
    } else {
        region.apply_inline(start, end, style);
    }
    // Styling never changes the text projection, so the saved offsets
    // are still the same logical range.
    region.restore_selection(saved);
    true
}

fn insert_nodes(
    region: &mut EditorRegion,
    saved: Option<Selection>,
    nodes: Vec<Node>,
) -> bool {
    let (start, end) = selection_bounds(region, saved);
    if start < end {
        region.delete_range(start, end);
    }
    let inserted: usize = nodes.iter().map(Node::text_len).sum();
    region.insert_at(start, nodes);
    region.restore_selection(Some(Selection::collapsed(start + inserted)));
    true
}

fn image_element(url: &str, position: ImagePosition) -> Element {
    let mut img = Element::new("img").with_attr("src", url);
    if let Some(css) = position.css() {
        img.set_attr("style", css);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Alignment, ListKind};

    fn region_with_selection(markup: &str, anchor: usize, head: usize) -> EditorRegion {
        let mut region = EditorRegion::from_markup(markup);
        region.set_selection(Some(Selection::new(anchor, head)));
        region
    }

    #[test]
    fn test_bold_toggle_roundtrip() {
        let mut region = region_with_selection("<p>hello world</p>", 0, 5);
        assert!(execute_command(&mut region, &Command::Bold));
        assert_eq!(
            region.markup(),
            "<p><span style=\"font-weight: bold\">hello</span> world</p>"
        );
        assert_eq!(region.selection(), Some(Selection::new(0, 5)));

        assert!(execute_command(&mut region, &Command::Bold));
        assert_eq!(region.markup(), "<p>hello world</p>");
        assert_eq!(region.selection(), Some(Selection::new(0, 5)));
    }

    #[test]
    fn test_bold_toggle_over_rendered_math_leaves_node_whole() {
        let markup = "<b><span class=\"math-render math-inline\" data-math-source=\"$xyzzy$\">xyzzy</span></b>tail";
        let mut region = region_with_selection(markup, 0, 3);
        assert!(execute_command(&mut region, &Command::Bold));
        assert_eq!(region.markup(), markup);
        assert_eq!(region.selection(), Some(Selection::new(0, 3)));
    }

    #[test]
    fn test_inline_toggle_without_selection_is_noop() {
        let mut region = EditorRegion::from_markup("<p>hello</p>");
        assert!(!execute_command(&mut region, &Command::Bold));
        assert_eq!(region.markup(), "<p>hello</p>");
        assert!(region.is_focused());
    }

    #[test]
    fn test_alignment_keeps_selection() {
        let mut region = region_with_selection("<p>one</p>", 1, 3);
        assert!(execute_command(&mut region, &Command::Align(Alignment::Center)));
        assert_eq!(region.markup(), "<p style=\"text-align: center\">one</p>");
        assert_eq!(region.selection(), Some(Selection::new(1, 3)));
    }

    #[test]
    fn test_heading_level_validation() {
        let mut region = region_with_selection("<p>title</p>", 0, 5);
        assert!(!execute_command(&mut region, &Command::Heading(7)));
        assert_eq!(region.markup(), "<p>title</p>");
        assert!(execute_command(&mut region, &Command::Heading(2)));
        assert_eq!(region.markup(), "<h2>title</h2>");
    }

    #[test]
    fn test_list_toggle() {
        let mut region = region_with_selection("<p>a</p><p>b</p>", 0, 2);
        assert!(execute_command(&mut region, &Command::List(ListKind::Ordered)));
        assert_eq!(region.markup(), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn test_insert_link_replaces_selection() {
        let mut region = region_with_selection("<p>see here now</p>", 4, 8);
        let cmd = Command::InsertLink {
            url: "https://example.com".into(),
            text: "docs".into(),
        };
        assert!(execute_command(&mut region, &cmd));
        assert_eq!(
            region.markup(),
            "<p>see <a href=\"https://example.com\">docs</a>now</p>"
        );
        // Cursor lands after the inserted text.
        assert_eq!(region.selection(), Some(Selection::collapsed(8)));
    }

    #[test]
    fn test_insert_image_at_cursor() {
        let mut region = EditorRegion::from_markup("<p>ab</p>");
        region.set_selection(Some(Selection::collapsed(1)));
        let cmd = Command::InsertImage {
            url: "/pic.png".into(),
            position: ImagePosition::Center,
        };
        assert!(execute_command(&mut region, &cmd));
        assert_eq!(
            region.markup(),
            "<p>a<img src=\"/pic.png\" style=\"display: block; margin: 0.5em auto\">b</p>"
        );
    }

    #[test]
    fn test_insert_html_fragment() {
        let mut region = EditorRegion::from_markup("<p>x</p>");
        region.set_selection(Some(Selection::collapsed(1)));
        let cmd = Command::InsertHtml {
            markup: "<b>!</b>".into(),
        };
        assert!(execute_command(&mut region, &cmd));
        assert_eq!(region.markup(), "<p>x<b>!</b></p>");
        assert_eq!(region.selection(), Some(Selection::collapsed(2)));
    }

    #[test]
    fn test_repeated_commands_keep_focus_in_region() {
        let mut region = region_with_selection("<p>hello world</p>", 0, 11);
        let commands = [
            Command::Bold,
            Command::Italic,
            Command::Align(Alignment::Right),
            Command::Underline,
            Command::Bold,
        ];
        for cmd in &commands {
            execute_command(&mut region, cmd);
            assert!(region.is_focused());
            if let Some(sel) = region.selection() {
                assert!(sel.end() <= region.text_len());
            }
        }
    }

    #[test]
    fn test_normalize_runs_after_command() {
        // Bolding two adjacent halves produces one merged run.
        let mut region = region_with_selection("<p>abcd</p>", 0, 2);
        execute_command(&mut region, &Command::Bold);
        region.set_selection(Some(Selection::new(2, 4)));
        execute_command(&mut region, &Command::Bold);
        assert_eq!(
            region.markup(),
            "<p><span style=\"font-weight: bold\">abcd</span></p>"
        );
    }
}
