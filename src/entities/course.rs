use chrono::TimeDelta;

use super::InvalidInput;
use crate::Id;

/// A course whose enrolled students must sit one final exam.
///
/// Immutable after load. The roster is not stored here; it is derived from
/// the student records when the [`EntityStore`](super::EntityStore) is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    id: Id,
    min_room_capacity: u32,
    exam_duration: TimeDelta,
}

impl Course {
    /// Builds a course record from normalized input facts.
    ///
    /// The exam duration arrives as a positive, finite number of hours and is
    /// kept with minute precision (`1.5` becomes 90 minutes).
    pub fn new(
        id: impl Into<Id>,
        min_room_capacity: u32,
        exam_duration_hours: f64,
    ) -> Result<Self, InvalidInput> {
        let id = id.into();
        if min_room_capacity == 0 {
            return Err(InvalidInput::NonPositiveCapacity { course: id });
        }
        if !exam_duration_hours.is_finite() || exam_duration_hours <= 0.0 {
            return Err(InvalidInput::NonPositiveDuration { course: id });
        }
        let minutes = (exam_duration_hours * 60.0).round() as i64;
        if minutes <= 0 {
            return Err(InvalidInput::NonPositiveDuration { course: id });
        }
        Ok(Self {
            id,
            min_room_capacity,
            exam_duration: TimeDelta::minutes(minutes),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Smallest room capacity this course will accept, regardless of how many
    /// students are actually enrolled.
    pub fn min_room_capacity(&self) -> u32 {
        self.min_room_capacity
    }

    pub fn exam_duration(&self) -> TimeDelta {
        self.exam_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_duration_with_minute_precision() {
        let c = Course::new("CS101", 30, 1.5).unwrap();
        assert_eq!(c.id(), "CS101");
        assert_eq!(c.min_room_capacity(), 30);
        assert_eq!(c.exam_duration(), TimeDelta::minutes(90));
    }

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            Course::new("CS101", 0, 2.0),
            Err(InvalidInput::NonPositiveCapacity {
                course: "CS101".into()
            })
        );
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(Course::new("CS101", 10, 0.0).is_err());
        assert!(Course::new("CS101", 10, -1.0).is_err());
        assert!(Course::new("CS101", 10, f64::NAN).is_err());
        // Rounds to zero minutes.
        assert!(Course::new("CS101", 10, 0.001).is_err());
    }
}
