use thiserror::Error;

use crate::timeline::TimeWindow;
use crate::Id;

/// One detected breach of a schedule correctness invariant.
///
/// Violations are reportable results, not program aborts: a non-empty list
/// means the producing engine is defective or the schedule came from an
/// untrusted source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("group {group} seats {students} students but room {room} holds {capacity}")]
    RoomOverCapacity {
        group: Id,
        room: Id,
        students: usize,
        capacity: u32,
    },

    #[error("student {student} has overlapping exams in groups {first_group} and {second_group}")]
    StudentOverlap {
        student: Id,
        first_group: Id,
        second_group: Id,
    },

    #[error("student {student} has no exam scheduled for course {course}")]
    MissingFinal { student: Id, course: Id },

    #[error("group {group} window {window} does not fit any availability window of room {room}")]
    OutsideAvailability {
        group: Id,
        room: Id,
        window: TimeWindow,
    },

    #[error("room {room} hosts overlapping groups {first_group} and {second_group}")]
    RoomDoubleBooked {
        room: Id,
        first_group: Id,
        second_group: Id,
    },

    #[error("student {student} is assigned to multiple groups for course {course}")]
    DuplicateAssignment {
        student: Id,
        course: Id,
        groups: Vec<Id>,
    },

    #[error("{assigned} student-group memberships found, {expected} enrollments expected")]
    MembershipCountMismatch { assigned: usize, expected: usize },
}
