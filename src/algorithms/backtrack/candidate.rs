//! Per-course candidate slot enumeration.

use std::collections::BTreeSet;

use chrono::TimeDelta;

use crate::entities::{Course, EntityStore};
use crate::timeline::TimeWindow;
use crate::Id;

/// A feasible (room, window) pairing for one course, ignoring interactions
/// with other courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOption {
    pub room: Id,
    pub window: TimeWindow,
}

/// Seats a room must offer to host `course` as one indivisible group.
///
/// The declared minimum capacity is a floor; the derived roster size wins
/// when it is larger, since every enrolled student sits together. Admitting
/// a smaller room would produce schedules the capacity invariant rejects.
pub(crate) fn required_seats(course: &Course, store: &EntityStore) -> usize {
    let roster = store
        .enrolled_students(course.id())
        .map_or(0, BTreeSet::len);
    roster.max(course.min_room_capacity() as usize)
}

/// Enumerates every candidate slot for a course: each room with enough
/// seats (rooms in identifier order), each of that room's availability
/// windows, start times advancing by `step` while the exam still fits.
///
/// The sequence is lazy and restartable; the engine re-walks it at every
/// search depth. Order is deterministic because the store keeps rooms and
/// windows sorted.
pub fn candidates<'a>(
    course: &'a Course,
    store: &'a EntityStore,
    step: TimeDelta,
) -> impl Iterator<Item = CandidateOption> + 'a {
    let seats = required_seats(course, store);
    let duration = course.exam_duration();
    store
        .rooms()
        .iter()
        .filter(move |room| room.capacity() as usize >= seats)
        .flat_map(move |room| {
            room.availability().iter().flat_map(move |window| {
                window.slots(duration, step).map(move |slot| CandidateOption {
                    room: room.id().to_owned(),
                    window: slot,
                })
            })
        })
}
