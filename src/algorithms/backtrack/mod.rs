//! Exhaustive backtracking search engine.
//!
//! Chronological depth-first backtracking over the course queue:
//!
//! 1. Take the next unscheduled course under the configured ordering policy.
//! 2. Enumerate its candidate (room, window) slots lazily, in generator
//!    order ([`candidate`]).
//! 3. Skip candidates the consistency check rejects ([`consistency`]).
//! 4. Commit, recurse on the remaining courses, undo on failure; a
//!    course's entry never survives a failed subtree ([`engine`]).
//!
//! There is no constraint propagation or forward checking beyond the
//! capacity pre-filter in candidate generation, and no memoization across
//! sibling subtrees; correctness relies on exhaustive enumeration with
//! undo. Worst-case cost is exponential, which is why the search carries
//! an optional node budget and wall-clock deadline ([`SearchConfig`]).
//!
//! # Module Structure
//!
//! - [`candidate`] - per-course candidate slot enumeration
//! - [`consistency`] - candidate vs. partial-assignment compatibility
//! - [`engine`] - the recursive search loop and export step
//! - [`observer`] - commit/backtrack tracing hook
//! - [`config`] - ordering policy, slot step, and budget knobs

mod candidate;
mod config;
mod consistency;
mod engine;
mod observer;

#[cfg(test)]
mod tests;

pub use candidate::{candidates, CandidateOption};
pub use config::{CourseOrder, SearchConfig};
pub use consistency::is_consistent;
pub use observer::{NoopObserver, SearchObserver};

use engine::{export, order_courses, search, Assignment, Budget, SearchStatus};

use crate::algorithms::{ExamScheduler, SolveOutcome};
use crate::entities::EntityStore;

/// Backtracking exam scheduler.
#[derive(Debug, Clone, Default)]
pub struct BacktrackScheduler {
    config: SearchConfig,
}

impl BacktrackScheduler {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search, reporting every commit and backtrack to `observer`.
    pub fn solve_with_observer(
        &self,
        store: &EntityStore,
        observer: &mut dyn SearchObserver,
    ) -> SolveOutcome {
        let queue = order_courses(store, self.config.order);
        let mut assignment = Assignment::new();
        let mut budget = Budget::new(&self.config);
        match search(
            store,
            &queue,
            &self.config,
            &mut assignment,
            &mut budget,
            observer,
        ) {
            SearchStatus::Solved => SolveOutcome::Solved(export(&assignment, store)),
            SearchStatus::Exhausted => SolveOutcome::Infeasible,
            SearchStatus::BudgetHit => SolveOutcome::BudgetExceeded {
                nodes_visited: budget.nodes_visited(),
            },
        }
    }
}

impl ExamScheduler for BacktrackScheduler {
    fn schedule(&self, store: &EntityStore) -> SolveOutcome {
        self.solve_with_observer(store, &mut NoopObserver)
    }
}
