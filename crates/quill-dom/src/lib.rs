//! quill-dom: lightweight owned markup tree for editor content.
//!
//! This crate provides:
//! - `Node`/`Element`/`Fragment` - a recursive owned tree of markup nodes
//! - a permissive HTML-fragment parser (never fails, browser-style recovery)
//! - a serializer that escapes text and attribute values
//! - `StyleSignature` - resolved inline-style comparison for formatting runs
//!
//! The tree is the canonical representation of editable content. All
//! higher-level passes (math substitution, normalization, formatting
//! commands) operate on this tree and scan text nodes only, rather than
//! rewriting markup strings with regexes.

pub mod escape;
pub mod node;
pub mod parse;
pub mod serialize;
pub mod style;

pub use escape::{escape_attr, escape_text};
pub use node::{Element, Fragment, Node};
pub use parse::parse_fragment;
pub use serialize::serialize_fragment;
pub use smol_str::SmolStr;
pub use style::{FORMATTING_TAGS, StyleSignature, is_formatting_wrapper};
