//! Standalone schedule verification.
//!
//! Re-derives the correctness invariants from the export artifact and the
//! entity snapshot alone, with no dependency on engine bookkeeping: a
//! defective engine cannot vouch for its own output. Business-rule
//! breaches are collected exhaustively as [`Violation`]s; only malformed
//! input (dangling references, empty groups) is fatal.
//!
//! The seven checks:
//!
//! 1. No group exceeds its room's capacity.
//! 2. No student sits two overlapping exams.
//! 3. Every enrollment is covered by some group.
//! 4. Every group's window fits a room availability window.
//! 5. No room hosts two overlapping groups.
//! 6. No student appears in two groups of the same course.
//! 7. Total group memberships equal total enrollments.

mod violation;

pub use violation::Violation;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use crate::entities::EntityStore;
use crate::schedule::Schedule;
use crate::timeline::TimeWindow;
use crate::Id;

/// Malformed verifier input. Business-rule failures never land here; they
/// go in the violation list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("group {group} references unknown room {room}")]
    UnknownRoom { group: Id, room: Id },

    #[error("group {group} references unknown course {course}")]
    UnknownCourse { group: Id, course: Id },

    #[error("group {group} lists unknown student {student}")]
    UnknownStudent { group: Id, student: Id },

    #[error("group {group} has no students")]
    EmptyGroup { group: Id },
}

/// Outcome of one verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationReport {
    violations: Vec<Violation>,
}

impl VerificationReport {
    /// True when no invariant was breached.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every violation found, in check order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Checks a schedule against every correctness invariant.
///
/// The checks are independent, run in a fixed order, and each reports all
/// the violations it finds, so two passes over unchanged inputs yield
/// identical reports. Neither input is mutated.
pub fn verify(schedule: &Schedule, store: &EntityStore) -> Result<VerificationReport, VerifyError> {
    check_references(schedule, store)?;

    let mut violations = Vec::new();
    check_room_capacity(schedule, store, &mut violations);
    check_student_conflicts(schedule, &mut violations);
    check_all_finals_covered(schedule, store, &mut violations);
    check_window_fits_room(schedule, store, &mut violations);
    check_room_double_booking(schedule, &mut violations);
    check_duplicate_assignments(schedule, &mut violations);
    check_membership_accounting(schedule, store, &mut violations);
    Ok(VerificationReport { violations })
}

/// Fail-fast pass over cross-references before the business checks run.
fn check_references(schedule: &Schedule, store: &EntityStore) -> Result<(), VerifyError> {
    for (group_id, group) in schedule.groups() {
        if group.students().is_empty() {
            return Err(VerifyError::EmptyGroup {
                group: group_id.to_owned(),
            });
        }
        if store.room(group.room()).is_none() {
            return Err(VerifyError::UnknownRoom {
                group: group_id.to_owned(),
                room: group.room().to_owned(),
            });
        }
        if store.course(group.course()).is_none() {
            return Err(VerifyError::UnknownCourse {
                group: group_id.to_owned(),
                course: group.course().to_owned(),
            });
        }
        for student in group.students() {
            if store.student(student).is_none() {
                return Err(VerifyError::UnknownStudent {
                    group: group_id.to_owned(),
                    student: student.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Check 1: no group exceeds its room's capacity.
fn check_room_capacity(schedule: &Schedule, store: &EntityStore, out: &mut Vec<Violation>) {
    for (group_id, group) in schedule.groups() {
        let Some(room) = store.room(group.room()) else {
            continue;
        };
        if group.students().len() > room.capacity() as usize {
            out.push(Violation::RoomOverCapacity {
                group: group_id.to_owned(),
                room: room.id().to_owned(),
                students: group.students().len(),
                capacity: room.capacity(),
            });
        }
    }
}

/// Check 2: no student sits two overlapping exams.
fn check_student_conflicts(schedule: &Schedule, out: &mut Vec<Violation>) {
    let mut sittings: BTreeMap<&str, Vec<(TimeWindow, &str)>> = BTreeMap::new();
    for (group_id, group) in schedule.groups() {
        for student in group.students() {
            sittings
                .entry(student)
                .or_default()
                .push((group.window(), group_id));
        }
    }

    for (student, mut windows) in sittings {
        windows.sort();
        for pair in windows.windows(2) {
            let (prev, prev_group) = pair[0];
            let (next, next_group) = pair[1];
            if prev.end() > next.start() {
                out.push(Violation::StudentOverlap {
                    student: student.to_owned(),
                    first_group: prev_group.to_owned(),
                    second_group: next_group.to_owned(),
                });
            }
        }
    }
}

/// Check 3: every enrollment is covered by some group.
fn check_all_finals_covered(schedule: &Schedule, store: &EntityStore, out: &mut Vec<Violation>) {
    let mut covered: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for (_, group) in schedule.groups() {
        for student in group.students() {
            covered
                .entry(student.as_str())
                .or_default()
                .insert(group.course());
        }
    }

    for student in store.students() {
        for course in student.enrolled_courses() {
            let has_final = covered
                .get(student.id())
                .is_some_and(|courses| courses.contains(course.as_str()));
            if !has_final {
                out.push(Violation::MissingFinal {
                    student: student.id().to_owned(),
                    course: course.clone(),
                });
            }
        }
    }
}

/// Check 4: every group's window fits one of its room's availability windows.
fn check_window_fits_room(schedule: &Schedule, store: &EntityStore, out: &mut Vec<Violation>) {
    for (group_id, group) in schedule.groups() {
        let Some(room) = store.room(group.room()) else {
            continue;
        };
        let window = group.window();
        if !room.availability().iter().any(|avail| avail.contains(&window)) {
            out.push(Violation::OutsideAvailability {
                group: group_id.to_owned(),
                room: room.id().to_owned(),
                window,
            });
        }
    }
}

/// Check 5: no room hosts two overlapping groups.
fn check_room_double_booking(schedule: &Schedule, out: &mut Vec<Violation>) {
    let mut bookings: BTreeMap<&str, Vec<(TimeWindow, &str)>> = BTreeMap::new();
    for (group_id, group) in schedule.groups() {
        bookings
            .entry(group.room())
            .or_default()
            .push((group.window(), group_id));
    }

    for (room, mut windows) in bookings {
        windows.sort();
        for pair in windows.windows(2) {
            let (prev, prev_group) = pair[0];
            let (next, next_group) = pair[1];
            if prev.end() > next.start() {
                out.push(Violation::RoomDoubleBooked {
                    room: room.to_owned(),
                    first_group: prev_group.to_owned(),
                    second_group: next_group.to_owned(),
                });
            }
        }
    }
}

/// Check 6: no student appears in two groups of the same course.
fn check_duplicate_assignments(schedule: &Schedule, out: &mut Vec<Violation>) {
    let mut assignments: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    for (group_id, group) in schedule.groups() {
        for student in group.students() {
            assignments
                .entry((student.as_str(), group.course()))
                .or_default()
                .push(group_id);
        }
    }

    for ((student, course), groups) in assignments {
        if groups.len() > 1 {
            out.push(Violation::DuplicateAssignment {
                student: student.to_owned(),
                course: course.to_owned(),
                groups: groups.into_iter().map(str::to_owned).collect(),
            });
        }
    }
}

/// Check 7: total group memberships equal total enrollments.
fn check_membership_accounting(schedule: &Schedule, store: &EntityStore, out: &mut Vec<Violation>) {
    let assigned: usize = schedule.groups().map(|(_, g)| g.students().len()).sum();
    let expected: usize = store
        .students()
        .iter()
        .map(|s| s.enrolled_courses().len())
        .sum();
    if assigned != expected {
        out.push(Violation::MembershipCountMismatch { assigned, expected });
    }
}
