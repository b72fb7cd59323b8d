//! quill-editor-core: rich-text editing logic without framework dependencies.
//!
//! This crate provides:
//! - `EditorRegion` - an owned editable content tree with selection and focus
//! - `Command` - semantic formatting operations (bold, alignment, lists, ...)
//! - `execute_command` - selection-preserving command execution
//! - `normalize` - formatting-run cleanup sweeping to a fixed point
//! - `Reprocessor` - per-editor mutation subscription with a fixed
//!   coalescing window driving math re-substitution
//! - `SnapshotHistory` - bounded undo/redo over region markup
//! - `Editor` - the public editor contract (value, change callback,
//!   placeholder, write/preview mode)

pub mod actions;
pub mod editor;
pub mod execute;
pub mod normalize;
pub mod region;
pub mod reprocess;
pub mod types;
pub mod undo;

pub use actions::{Alignment, Command, ImagePosition, ListKind};
pub use editor::{Editor, EditorMode};
pub use execute::execute_command;
pub use normalize::{MAX_SWEEPS, normalize};
pub use region::EditorRegion;
pub use reprocess::{COALESCE_WINDOW, Mutation, MutationKind, Reprocessor};
pub use types::Selection;
pub use undo::{SnapshotHistory, UndoManager};
