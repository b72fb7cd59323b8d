//! Mutation coalescing for math reprocessing.
//!
//! Each editor instance owns one `Reprocessor`, created on mount and
//! dropped on unmount. Qualifying mutations open a fixed coalescing
//! window; every mutation that lands inside the window is batched into
//! the single pass that runs when the window closes. The window is
//! fixed, not a debounce: later mutations do not push the deadline
//! back, so a steady stream of edits still gets processed.
//!
//! Self-exclusion: mutations whose target sits inside an editable
//! control or inside rendered-math output never qualify. Rendering
//! math mutates the tree, and without this rule that mutation would
//! schedule another scan of its own output.

use web_time::{Duration, Instant};

use tracing::trace;

/// Fixed coalescing window between the first qualifying mutation and
/// the reprocessing pass it schedules.
pub const COALESCE_WINDOW: Duration = Duration::from_millis(100);

/// What changed in the observed subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Child nodes were added or removed.
    ChildList,
    /// A text node's data changed.
    CharacterData,
}

/// One observed mutation, with enough target context to apply the
/// exclusion rules.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    pub kind: MutationKind,
    /// Target is inside an editable/input control.
    pub in_editable_control: bool,
    /// Target is inside an already-rendered math node.
    pub in_rendered_math: bool,
}

impl Mutation {
    /// Whether this mutation should schedule a reprocessing pass.
    pub fn qualifies(&self) -> bool {
        !self.in_editable_control && !self.in_rendered_math
    }
}

/// Schedules one reprocessing pass per coalescing window.
///
/// The caller drives time explicitly: `record` on each mutation,
/// `take_due` on each tick. Dropping the reprocessor cancels any
/// pending pass.
#[derive(Debug, Default)]
pub struct Reprocessor {
    deadline: Option<Instant>,
    batched: usize,
}

impl Reprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation at `now`. Returns true if it qualified.
    ///
    /// The first qualifying mutation opens the window; later ones are
    /// batched into the already-scheduled pass without extending it.
    pub fn record(&mut self, mutation: Mutation, now: Instant) -> bool {
        if !mutation.qualifies() {
            trace!(kind = ?mutation.kind, "mutation excluded from reprocessing");
            return false;
        }
        self.batched += 1;
        if self.deadline.is_none() {
            self.deadline = Some(now + COALESCE_WINDOW);
            trace!("coalescing window opened");
        }
        true
    }

    /// Whether a pass is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// If the window has closed, consume the batch and return its
    /// size. Returns `None` while the window is still open or nothing
    /// is scheduled. At most one pass fires per window.
    pub fn take_due(&mut self, now: Instant) -> Option<usize> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let batched = std::mem::take(&mut self.batched);
        trace!(batched, "coalescing window closed");
        Some(batched)
    }

    /// Drop any scheduled pass. Called on unmount so a pass never
    /// fires against a detached region.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.batched = 0;
    }
}
