//! The recursive search loop: commit, recurse, undo.

use std::time::Instant;

use super::candidate::{candidates, CandidateOption};
use super::config::{CourseOrder, SearchConfig};
use super::consistency::is_consistent;
use super::observer::SearchObserver;
use crate::entities::{Course, EntityStore};
use crate::schedule::{ExamGroup, Schedule};
use crate::Id;

/// In-progress mapping from course to committed option.
///
/// Exclusively owned by one search execution and mutated with strict stack
/// discipline: push before recursing, pop when the subtree fails. No other
/// component ever observes it mid-search.
pub(super) type Assignment = Vec<(Id, CandidateOption)>;

pub(super) enum SearchStatus {
    Solved,
    Exhausted,
    BudgetHit,
}

/// Node and wall-clock accounting for one search execution.
pub(super) struct Budget {
    nodes_visited: u64,
    max_nodes: Option<u64>,
    deadline: Option<Instant>,
}

impl Budget {
    pub(super) fn new(config: &SearchConfig) -> Self {
        Self {
            nodes_visited: 0,
            max_nodes: config.max_nodes,
            deadline: config.time_limit.map(|limit| Instant::now() + limit),
        }
    }

    pub(super) fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    /// Accounts one search node; false once the budget is spent.
    fn admit(&mut self) -> bool {
        self.nodes_visited += 1;
        if let Some(max) = self.max_nodes {
            if self.nodes_visited > max {
                return false;
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        true
    }
}

/// Builds the course queue under the configured ordering policy.
///
/// Courses nobody is enrolled in need no sitting and are left out: a group
/// without students is not a valid export, and committing a room slot to
/// one could only displace courses that do need it.
pub(super) fn order_courses(store: &EntityStore, order: CourseOrder) -> Vec<&Course> {
    let mut queue: Vec<&Course> = store
        .courses()
        .iter()
        .filter(|course| {
            store
                .enrolled_students(course.id())
                .is_some_and(|roster| !roster.is_empty())
        })
        .collect();
    if order == CourseOrder::LargestFirst {
        // Stable sort keeps input order between equal-sized rosters.
        queue.sort_by_key(|course| {
            std::cmp::Reverse(store.enrolled_students(course.id()).map_or(0, |r| r.len()))
        });
    }
    queue
}

/// Depth-first chronological backtracking over `queue`.
///
/// On `Solved` the assignment holds one committed option per course, in
/// commit order. On `Exhausted` and `BudgetHit` the assignment is restored
/// to the state the caller passed in.
pub(super) fn search(
    store: &EntityStore,
    queue: &[&Course],
    config: &SearchConfig,
    assignment: &mut Assignment,
    budget: &mut Budget,
    observer: &mut dyn SearchObserver,
) -> SearchStatus {
    if !budget.admit() {
        return SearchStatus::BudgetHit;
    }
    let Some((&course, rest)) = queue.split_first() else {
        return SearchStatus::Solved;
    };

    for option in candidates(course, store, config.slot_step) {
        if !is_consistent(course, &option, assignment, store) {
            continue;
        }
        observer.on_commit(course.id(), &option);
        assignment.push((course.id().to_owned(), option));
        match search(store, rest, config, assignment, budget, observer) {
            SearchStatus::Solved => return SearchStatus::Solved,
            SearchStatus::BudgetHit => {
                assignment.pop();
                return SearchStatus::BudgetHit;
            }
            SearchStatus::Exhausted => {
                assignment.pop();
                observer.on_backtrack(course.id());
            }
        }
    }
    SearchStatus::Exhausted
}

/// Exports a finished assignment: one group per course, ids generated in
/// commit order, rosters taken from the entity snapshot.
pub(super) fn export(assignment: &Assignment, store: &EntityStore) -> Schedule {
    let mut schedule = Schedule::new();
    for (course, option) in assignment {
        let students = store
            .enrolled_students(course)
            .into_iter()
            .flat_map(|roster| roster.iter().cloned());
        schedule.push(ExamGroup::new(
            course.clone(),
            option.room.clone(),
            option.window,
            students,
        ));
    }
    schedule
}
