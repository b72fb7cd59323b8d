//! The editor facade.
//!
//! An `Editor` owns one editable region for the span between `mount`
//! and `unmount`, together with its undo history and its mutation
//! reprocessor. Surrounding UI hands it a markup-string value and an
//! on-change callback, and drives time explicitly: `command` on user
//! actions, `observe` on platform mutations, `tick` once per event-loop
//! turn to run any due math pass.
//!
//! Commands invoked while unmounted are no-ops, never errors.

use quill_dom::parse_fragment;
use quill_render::{process_fragment, render_preview};
use tracing::debug;
use web_time::Instant;

use crate::actions::Command;
use crate::execute::execute_command;
use crate::normalize::normalize;
use crate::region::EditorRegion;
use crate::reprocess::{Mutation, MutationKind, Reprocessor};
use crate::types::Selection;
use crate::undo::{SnapshotHistory, UndoManager};

/// Write/preview toggle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Write,
    Preview,
}

type ChangeCallback = Box<dyn FnMut(&str)>;

/// A rich-text, math-capable editor instance.
pub struct Editor {
    region: Option<EditorRegion>,
    history: SnapshotHistory,
    reprocessor: Reprocessor,
    mode: EditorMode,
    placeholder: Option<String>,
    on_change: Option<ChangeCallback>,
}

impl Editor {
    /// Create an editor holding the given markup value, not yet
    /// mounted.
    pub fn new(value: &str) -> Self {
        Self {
            region: None,
            history: SnapshotHistory::new(value, 100),
            reprocessor: Reprocessor::new(),
            mode: EditorMode::Write,
            placeholder: None,
            on_change: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Register the callback invoked with the updated markup string on
    /// every user edit.
    pub fn set_on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    /// Current markup value, whether or not the editor is mounted.
    pub fn value(&self) -> &str {
        self.history.current()
    }

    /// Replace the value programmatically. Resets undo history and
    /// does not fire the change callback.
    pub fn set_value(&mut self, markup: &str) {
        self.history.reset(markup);
        if let Some(region) = &mut self.region {
            region.set_markup(markup);
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Render the current value through the math pipeline, for the
    /// preview pane.
    pub fn preview(&self) -> String {
        render_preview(self.value())
    }

    /// Visible character count of the current value.
    pub fn char_count(&self) -> usize {
        match &self.region {
            Some(region) => region.text_len(),
            None => parse_fragment(self.value()).text_len(),
        }
    }

    // === Lifecycle ===

    pub fn is_mounted(&self) -> bool {
        self.region.is_some()
    }

    /// Create the editable region from the current value.
    pub fn mount(&mut self) {
        debug!("editor mounted");
        self.region = Some(EditorRegion::from_markup(self.value()));
    }

    /// Drop the region and cancel any pending reprocessing pass, so a
    /// pass never fires against a detached region.
    pub fn unmount(&mut self) {
        debug!("editor unmounted");
        self.reprocessor.cancel();
        self.region = None;
    }

    pub fn region(&self) -> Option<&EditorRegion> {
        self.region.as_ref()
    }

    pub fn region_mut(&mut self) -> Option<&mut EditorRegion> {
        self.region.as_mut()
    }

    /// Set the selection in the mounted region.
    pub fn select(&mut self, selection: Selection) {
        if let Some(region) = &mut self.region {
            region.set_selection(Some(selection));
        }
    }

    // === Editing ===

    /// Execute a formatting command against the mounted region.
    ///
    /// Returns true if the command was applied. With no mounted region
    /// this is a silent no-op.
    pub fn command(&mut self, command: &Command, now: Instant) -> bool {
        let Some(region) = &mut self.region else {
            debug!(?command, "command ignored, no region mounted");
            return false;
        };
        if !execute_command(region, command) {
            return false;
        }
        let markup = region.markup();
        self.history.commit(&markup);
        self.reprocessor.record(
            Mutation {
                kind: MutationKind::ChildList,
                in_editable_control: false,
                in_rendered_math: false,
            },
            now,
        );
        self.fire_change(&markup);
        true
    }

    /// Feed an externally observed mutation into the reprocessor.
    /// Returns true if it qualified and a pass is now pending.
    pub fn observe(&mut self, mutation: Mutation, now: Instant) -> bool {
        if self.region.is_none() {
            return false;
        }
        self.reprocessor.record(mutation, now)
    }

    /// Run any due reprocessing pass: scan the region for math spans
    /// and substitute rendered nodes. Returns true if the pass ran and
    /// changed the content.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.reprocessor.take_due(now).is_none() {
            return false;
        }
        let Some(region) = &mut self.region else {
            return false;
        };
        let rendered = process_fragment(region.tree_mut());
        if rendered == 0 {
            return false;
        }
        normalize(region.tree_mut());
        debug!(rendered, "reprocessing pass substituted math spans");
        let markup = region.markup();
        self.history.commit(&markup);
        self.fire_change(&markup);
        true
    }

    // === History ===

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Roll the region back to the previous snapshot.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.apply_snapshot();
        true
    }

    /// Re-apply the last undone snapshot.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.apply_snapshot();
        true
    }

    fn apply_snapshot(&mut self) {
        let markup = self.history.current().to_string();
        if let Some(region) = &mut self.region {
            region.set_markup(&markup);
        }
        self.fire_change(&markup);
    }

    fn fire_change(&mut self, markup: &str) {
        if let Some(callback) = &mut self.on_change {
            callback(markup);
        }
    }
}
