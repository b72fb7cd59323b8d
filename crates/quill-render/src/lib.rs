//! quill-render: LaTeX math rendering and substitution for blog content.
//!
//! This crate provides:
//! - `render_math` - LaTeX → MathML via pulldown-latex, with error-span
//!   fallback (rendering failures never propagate to callers)
//! - a fixed macro table with bounded textual expansion
//! - the math substitution scanner, in string mode and tree mode
//! - `render_preview` - the write/preview pipeline over a markup string
//!
//! The notation surface is the bit-exact contract with previously authored
//! content: `\[...\]` and `$$...$$` for block math, `\(...\)` and `$...$`
//! for inline math, with a currency guard on bare-number `$...$` spans.

pub mod macros;
pub mod math;
pub mod scan;

pub use macros::expand_macros;
pub use math::{MathResult, RENDERED_CLASS, SOURCE_ATTR, render_math, render_math_node};
pub use scan::{
    Delimiter, MathSpan, find_block_spans, find_inline_spans, process_fragment, render_preview,
    substitute_math,
};
