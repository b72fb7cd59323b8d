//! Markup normalization: collapse redundant formatting wrappers.
//!
//! Invoked after every mutation to the editable region. Two rules:
//! empty formatting wrappers are removed, and adjacent sibling wrappers
//! with identical resolved style signatures are merged (the second
//! wrapper's children are re-parented into the first). Merges can
//! create new adjacency opportunities, so the pass sweeps to a fixed
//! point, bounded to avoid pathological trees.
//!
//! Normalization is a best-effort cleanliness pass. Nodes it does not
//! recognize are left alone, never an error.

use quill_dom::{Fragment, Node, StyleSignature, is_formatting_wrapper};
use quill_render::RENDERED_CLASS;
use tracing::trace;

/// Upper bound on sweeps before giving up on convergence.
pub const MAX_SWEEPS: usize = 16;

/// Normalize the fragment in place. Returns true if anything changed.
pub fn normalize(fragment: &mut Fragment) -> bool {
    let mut changed = false;
    for sweep in 0..MAX_SWEEPS {
        if !sweep_children(&mut fragment.children) {
            trace!(sweeps = sweep + 1, "normalize converged");
            return changed;
        }
        changed = true;
    }
    trace!(sweeps = MAX_SWEEPS, "normalize sweep budget exhausted");
    changed
}

/// One sweep over a sibling list (and, recursively, its descendants).
/// Returns true if the sweep changed anything.
fn sweep_children(children: &mut Vec<Node>) -> bool {
    let mut changed = false;

    // Drop empty formatting wrappers. Wrappers carrying any attribute
    // beyond `style` (placeholder markers, rendered-math classes) are
    // not formatting wrappers and survive.
    let before = children.len();
    children.retain(|node| match node {
        Node::Element(el) => !(is_formatting_wrapper(el) && el.children.is_empty()),
        Node::Text(s) => !s.is_empty(),
    });
    changed |= children.len() != before;

    // Merge adjacent sibling wrappers with identical signatures.
    let mut i = 0;
    while i + 1 < children.len() {
        let mergeable = match (&children[i], &children[i + 1]) {
            (Node::Element(a), Node::Element(b)) => {
                is_formatting_wrapper(a)
                    && is_formatting_wrapper(b)
                    && StyleSignature::resolve(a) == StyleSignature::resolve(b)
            }
            _ => false,
        };
        if mergeable {
            let Node::Element(second) = children.remove(i + 1) else {
                unreachable!()
            };
            let Node::Element(first) = &mut children[i] else {
                unreachable!()
            };
            first.children.extend(second.children);
            changed = true;
        } else {
            i += 1;
        }
    }

    // Recurse, skipping rendered-math output.
    for node in children.iter_mut() {
        if let Node::Element(el) = node {
            if el.has_class(RENDERED_CLASS) {
                continue;
            }
            changed |= sweep_children(&mut el.children);
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_dom::{parse_fragment, serialize_fragment};

    fn normalized(markup: &str) -> String {
        let mut frag = parse_fragment(markup);
        normalize(&mut frag);
        serialize_fragment(&frag)
    }

    #[test]
    fn test_merges_adjacent_identical_spans() {
        assert_eq!(
            normalized(
                "<span style=\"font-weight: bold\">A</span><span style=\"font-weight: bold\">B</span>"
            ),
            "<span style=\"font-weight: bold\">AB</span>"
        );
    }

    #[test]
    fn test_keeps_different_signatures() {
        let markup =
            "<span style=\"color: red\">A</span><span style=\"color: blue\">B</span>";
        assert_eq!(normalized(markup), markup);
    }

    #[test]
    fn test_merges_across_normalized_values() {
        assert_eq!(
            normalized("<span style=\"COLOR: Red;\">A</span><span style=\"color:red\">B</span>"),
            "<span style=\"COLOR: Red;\">AB</span>"
        );
    }

    #[test]
    fn test_removes_empty_wrappers() {
        assert_eq!(normalized("a<span style=\"color: red\"></span>b"), "ab");
        assert_eq!(normalized("a<b></b>b"), "ab");
    }

    #[test]
    fn test_keeps_marked_placeholders() {
        let markup = "a<span data-placeholder></span>b";
        assert_eq!(normalized(markup), markup);
    }

    #[test]
    fn test_merge_creates_new_adjacency() {
        // Removing the empty middle wrapper makes the outer two
        // adjacent; a later sweep must merge them.
        let markup = "<span style=\"color: red\">A</span><span style=\"color: blue\"></span><span style=\"color: red\">B</span>";
        assert_eq!(normalized(markup), "<span style=\"color: red\">AB</span>");
    }

    #[test]
    fn test_recurses_into_blocks() {
        assert_eq!(
            normalized("<p><b>A</b><b>B</b></p>"),
            "<p><b>AB</b></p>"
        );
    }

    #[test]
    fn test_skips_rendered_math() {
        let markup = "<span class=\"math-render math-inline\" data-math-source=\"$x$\"><b>x</b><b>y</b></span>";
        assert_eq!(normalized(markup), markup);
    }

    #[test]
    fn test_idempotent() {
        let markup = "<p><span style=\"font-weight: bold\">A</span><span style=\"font-weight: bold\">B</span>c<i></i></p>";
        let once = normalized(markup);
        let twice = normalized(&once);
        assert_eq!(once, twice);
        let mut frag = parse_fragment(&once);
        assert!(!normalize(&mut frag));
    }
}
