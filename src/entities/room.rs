use super::InvalidInput;
use crate::timeline::TimeWindow;
use crate::Id;

/// A physical space with a seating capacity and the time windows during
/// which it may host exams.
///
/// Source data treats a room's own windows as non-overlapping by convention;
/// that convention is not enforced here.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    id: Id,
    capacity: u32,
    availability: Vec<TimeWindow>,
}

impl Room {
    /// Builds a room record. The capacity must be positive and at least one
    /// availability window must be given.
    ///
    /// Windows are sorted by start time so downstream enumeration never
    /// depends on input order.
    pub fn new(
        id: impl Into<Id>,
        capacity: u32,
        mut availability: Vec<TimeWindow>,
    ) -> Result<Self, InvalidInput> {
        let id = id.into();
        if capacity == 0 {
            return Err(InvalidInput::ZeroRoomCapacity { room: id });
        }
        if availability.is_empty() {
            return Err(InvalidInput::NoAvailability { room: id });
        }
        availability.sort();
        Ok(Self {
            id,
            capacity,
            availability,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Availability windows, sorted by start time.
    pub fn availability(&self) -> &[TimeWindow] {
        &self.availability
    }
}
