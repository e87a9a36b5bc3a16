use thiserror::Error;

use crate::timeline::InvalidWindow;
use crate::Id;

/// Malformed entity facts, rejected while building the
/// [`EntityStore`](super::EntityStore) and never discovered mid-search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("course {course} must require a positive room capacity")]
    NonPositiveCapacity { course: Id },

    #[error("course {course} must have a positive exam duration")]
    NonPositiveDuration { course: Id },

    #[error("room {room} has zero capacity")]
    ZeroRoomCapacity { room: Id },

    #[error("room {room} has no availability windows")]
    NoAvailability { room: Id },

    #[error("duplicate course id: {0}")]
    DuplicateCourse(Id),

    #[error("duplicate room id: {0}")]
    DuplicateRoom(Id),

    #[error("duplicate student id: {0}")]
    DuplicateStudent(Id),

    #[error("student {student} is enrolled in unknown course {course}")]
    UnknownCourse { student: Id, course: Id },

    #[error(transparent)]
    Window(#[from] InvalidWindow),
}
