//! Compatibility check between a candidate and the partial assignment.

use super::candidate::CandidateOption;
use crate::entities::{Course, EntityStore};
use crate::Id;

/// Decides whether committing `option` for `course` keeps the partial
/// assignment conflict-free.
///
/// Pure function, O(committed options). A candidate clashes with a
/// committed option when their windows overlap (half-open: touching
/// endpoints never conflict) and either both use the same room, or the two
/// courses share at least one enrolled student. The student test compares
/// whole rosters because this engine schedules a course as one indivisible
/// group.
pub fn is_consistent(
    course: &Course,
    option: &CandidateOption,
    assignment: &[(Id, CandidateOption)],
    store: &EntityStore,
) -> bool {
    assignment.iter().all(|(other_course, other)| {
        if !option.window.overlaps(&other.window) {
            return true;
        }
        option.room != other.room && !store.courses_conflict(course.id(), other_course)
    })
}
