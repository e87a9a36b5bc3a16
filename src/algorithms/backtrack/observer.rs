//! Commit/backtrack tracing hook.

use super::candidate::CandidateOption;

/// Observes search progress.
///
/// The engine reports every tentative commit and every undo. Default
/// implementations do nothing, so implementors override only the events
/// they care about.
pub trait SearchObserver {
    /// A course was tentatively assigned an option.
    fn on_commit(&mut self, _course: &str, _option: &CandidateOption) {}

    /// A course's assignment was undone after its subtree failed.
    fn on_backtrack(&mut self, _course: &str) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}
