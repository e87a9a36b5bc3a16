//! examina - constraint-based final exam scheduling.
//!
//! Assigns each course's final exam to a (room, time-window) slot such that
//! room capacity, room availability, and student/room no-conflict constraints
//! hold, or reports that no complete schedule exists. A standalone verifier
//! re-derives the correctness invariants from the exported [`Schedule`] alone,
//! independent of any engine bookkeeping.
//!
//! [`Schedule`]: schedule::Schedule

pub mod algorithms;
pub mod entities;
pub mod schedule;
pub mod timeline;
pub mod verify;

/// Identifier type used for courses, rooms, students, and exam groups.
pub type Id = String;
