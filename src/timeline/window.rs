//! Half-open time window representation.

use std::fmt::Display;

use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

/// Rejected window bounds: the end does not lie strictly after the start.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("time window must end after it starts ({start} >= {end})")]
pub struct InvalidWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Half-open wall-clock interval `[start, end)`.
///
/// Touching windows (one ending exactly when the other starts) share no
/// instant and therefore do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates the window `[start, end)`.
    ///
    /// Fails with [`InvalidWindow`] unless `start < end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, InvalidWindow> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(InvalidWindow { start, end })
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns true if the two windows share at least one instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `other` lies entirely within this window.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Enumerates every sub-window of length `duration` that fits in this
    /// window, starting at `start()` and advancing by `step`.
    ///
    /// The sequence is lazy and restartable; call sites re-invoke it freely.
    ///
    /// # Panics
    ///
    /// Panics if `step` or `duration` is not positive.
    pub fn slots(self, duration: TimeDelta, step: TimeDelta) -> impl Iterator<Item = TimeWindow> {
        assert!(step > TimeDelta::zero(), "slot step must be positive");
        assert!(duration > TimeDelta::zero(), "slot duration must be positive");
        std::iter::successors(Some(self.start), move |s| Some(*s + step))
            .take_while(move |s| *s + duration <= self.end)
            .map(move |s| TimeWindow {
                start: s,
                end: s + duration,
            })
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}
