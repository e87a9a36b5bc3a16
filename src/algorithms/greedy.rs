//! Greedy first-fit scheduler with roster splitting.
//!
//! Schedules the biggest class first, seating students into the first free
//! (room, slot) pair that takes at least one of them; a roster too large
//! for any single room is split across several groups. Conflict checks run
//! against the specific students seated in each group rather than whole
//! rosters, so two courses sharing students may sit at overlapping times as
//! long as no individual student is double-booked. A course's declared
//! minimum room capacity is a whole-group placement constraint and is not
//! consulted when splitting.
//!
//! No completeness guarantee: when a placement pass cannot seat anyone the
//! run reports [`SolveOutcome::Infeasible`] rather than a partial schedule.

use std::collections::HashMap;

use chrono::TimeDelta;

use super::{ExamScheduler, SolveOutcome};
use crate::entities::{Course, EntityStore};
use crate::schedule::{ExamGroup, Schedule};
use crate::timeline::TimeWindow;
use crate::Id;

/// Committed windows per student or room id.
type BusyMap = HashMap<Id, Vec<TimeWindow>>;

fn is_free(busy: &BusyMap, id: &str, window: TimeWindow) -> bool {
    busy.get(id)
        .map_or(true, |windows| windows.iter().all(|w| !w.overlaps(&window)))
}

/// First-fit splitting scheduler.
#[derive(Debug, Clone)]
pub struct GreedyScheduler {
    slot_step: TimeDelta,
}

impl GreedyScheduler {
    pub fn new() -> Self {
        Self {
            slot_step: TimeDelta::minutes(30),
        }
    }

    pub fn with_slot_step(slot_step: TimeDelta) -> Self {
        Self { slot_step }
    }
}

impl Default for GreedyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamScheduler for GreedyScheduler {
    fn schedule(&self, store: &EntityStore) -> SolveOutcome {
        let mut schedule = Schedule::new();
        let mut student_busy = BusyMap::new();
        let mut room_busy = BusyMap::new();

        let mut queue: Vec<&Course> = store.courses().iter().collect();
        queue.sort_by_key(|course| {
            std::cmp::Reverse(store.enrolled_students(course.id()).map_or(0, |r| r.len()))
        });

        for course in queue {
            let mut unscheduled: Vec<Id> = store
                .enrolled_students(course.id())
                .map(|roster| roster.iter().cloned().collect())
                .unwrap_or_default();

            while !unscheduled.is_empty() {
                let Some((room, slot, seated)) = place_group(
                    course,
                    store,
                    &unscheduled,
                    &student_busy,
                    &room_busy,
                    self.slot_step,
                ) else {
                    // Nobody could be seated anywhere; partial results are
                    // not an outcome we return.
                    return SolveOutcome::Infeasible;
                };

                for student in &seated {
                    student_busy.entry(student.clone()).or_default().push(slot);
                }
                room_busy.entry(room.clone()).or_default().push(slot);
                unscheduled.retain(|s| !seated.contains(s));
                schedule.push(ExamGroup::new(course.id(), room, slot, seated));
            }
        }

        SolveOutcome::Solved(schedule)
    }
}

/// Finds the first (room, slot) able to seat at least one pending student,
/// returning the students seated there (capacity-bounded, roster order).
fn place_group(
    course: &Course,
    store: &EntityStore,
    unscheduled: &[Id],
    student_busy: &BusyMap,
    room_busy: &BusyMap,
    step: TimeDelta,
) -> Option<(Id, TimeWindow, Vec<Id>)> {
    for room in store.rooms() {
        for window in room.availability() {
            for slot in window.slots(course.exam_duration(), step) {
                if !is_free(room_busy, room.id(), slot) {
                    continue;
                }
                let seated: Vec<Id> = unscheduled
                    .iter()
                    .filter(|student| is_free(student_busy, student.as_str(), slot))
                    .take(room.capacity() as usize)
                    .cloned()
                    .collect();
                if !seated.is_empty() {
                    return Some((room.id().to_owned(), slot, seated));
                }
            }
        }
    }
    None
}
