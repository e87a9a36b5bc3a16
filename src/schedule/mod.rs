use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::timeline::TimeWindow;
use crate::Id;


/// One exam sitting: the students taking a course's final together in a room
/// during one time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamGroup {
    course: Id,
    room: Id,
    window: TimeWindow,
    students: BTreeSet<Id>,
}

impl ExamGroup {
    pub fn new(
        course: impl Into<Id>,
        room: impl Into<Id>,
        window: TimeWindow,
        students: impl IntoIterator<Item = Id>,
    ) -> Self {
        Self {
            course: course.into(),
            room: room.into(),
            window,
            students: students.into_iter().collect(),
        }
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn students(&self) -> &BTreeSet<Id> {
        &self.students
    }
}

/// Group id is already present in the schedule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("exam group id {0} already exists in schedule")]
pub struct DuplicateGroup(pub Id);

/// The terminal export artifact: generated group ids mapped to exam groups.
///
/// A `Schedule` is the sole contract between the schedulers and the
/// verifier, and the only artifact downstream presentation layers consume.
/// Once emitted it is treated as read-only; the verifier re-derives every
/// invariant from it plus the entity store.
///
/// Group ids are generated in commit order as `group_0001`, `group_0002`, …
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use examina::schedule::{ExamGroup, Schedule};
/// use examina::timeline::TimeWindow;
///
/// let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
/// let window = TimeWindow::new(
///     date.and_hms_opt(9, 0, 0).unwrap(),
///     date.and_hms_opt(11, 0, 0).unwrap(),
/// )
/// .unwrap();
///
/// let mut schedule = Schedule::new();
/// let id = schedule.push(ExamGroup::new("CS101", "R1", window, vec!["alice".into()]));
/// assert_eq!(id, "group_0001");
/// assert_eq!(schedule.get(&id).unwrap().room(), "R1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    groups: BTreeMap<Id, ExamGroup>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, group_id: &str) -> Option<&ExamGroup> {
        self.groups.get(group_id)
    }

    /// Adds a group under the next generated id and returns that id.
    pub fn push(&mut self, group: ExamGroup) -> Id {
        let id = format!("group_{:04}", self.groups.len() + 1);
        self.groups.insert(id.clone(), group);
        id
    }

    /// Inserts a group under an explicit id, as when re-ingesting an
    /// exported schedule from an outside producer.
    pub fn insert(&mut self, id: impl Into<Id>, group: ExamGroup) -> Result<(), DuplicateGroup> {
        let id = id.into();
        if self.groups.contains_key(&id) {
            return Err(DuplicateGroup(id));
        }
        self.groups.insert(id, group);
        Ok(())
    }

    /// Iterates over `(group id, group)` pairs in group-id order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &ExamGroup)> {
        self.groups.iter().map(|(id, g)| (id.as_str(), g))
    }
}

// =============================================================================
// Schedule Serde Support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use chrono::NaiveDateTime;
    use serde::de::{self, IgnoredAny, MapAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeStruct};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Timestamp format used at the export boundary (ISO-8601, no offset).
    const EXPORT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    struct SlotOut<'a> {
        room: &'a str,
        window: TimeWindow,
    }

    impl Serialize for SlotOut<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut s = serializer.serialize_struct("RoomSlot", 3)?;
            s.serialize_field("room_id", self.room)?;
            s.serialize_field(
                "start",
                &self.window.start().format(EXPORT_TIME_FORMAT).to_string(),
            )?;
            s.serialize_field(
                "end",
                &self.window.end().format(EXPORT_TIME_FORMAT).to_string(),
            )?;
            s.end()
        }
    }

    struct GroupOut<'a> {
        group: &'a ExamGroup,
    }

    impl Serialize for GroupOut<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut s = serializer.serialize_struct("ExamGroup", 3)?;
            s.serialize_field("students", &self.group.students)?;
            s.serialize_field(
                "room",
                &SlotOut {
                    room: &self.group.room,
                    window: self.group.window,
                },
            )?;
            s.serialize_field("course_id", &self.group.course)?;
            s.end()
        }
    }

    impl Serialize for Schedule {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (id, group) in self.groups() {
                map.serialize_entry(id, &GroupOut { group })?;
            }
            map.end()
        }
    }

    struct SlotIn {
        room: Id,
        window: TimeWindow,
    }

    impl<'de> Deserialize<'de> for SlotIn {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct SlotVisitor;

            impl<'de> Visitor<'de> for SlotVisitor {
                type Value = SlotIn;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a room slot with 'room_id', 'start', and 'end' fields")
                }

                fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut room: Option<Id> = None;
                    let mut start: Option<String> = None;
                    let mut end: Option<String> = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "room_id" => {
                                if room.is_some() {
                                    return Err(de::Error::duplicate_field("room_id"));
                                }
                                room = Some(map.next_value()?);
                            }
                            "start" => {
                                if start.is_some() {
                                    return Err(de::Error::duplicate_field("start"));
                                }
                                start = Some(map.next_value()?);
                            }
                            "end" => {
                                if end.is_some() {
                                    return Err(de::Error::duplicate_field("end"));
                                }
                                end = Some(map.next_value()?);
                            }
                            _ => {
                                let _ = map.next_value::<IgnoredAny>()?;
                            }
                        }
                    }

                    let room = room.ok_or_else(|| de::Error::missing_field("room_id"))?;
                    let start = start.ok_or_else(|| de::Error::missing_field("start"))?;
                    let end = end.ok_or_else(|| de::Error::missing_field("end"))?;

                    let start = NaiveDateTime::parse_from_str(&start, EXPORT_TIME_FORMAT)
                        .map_err(de::Error::custom)?;
                    let end = NaiveDateTime::parse_from_str(&end, EXPORT_TIME_FORMAT)
                        .map_err(de::Error::custom)?;
                    let window = TimeWindow::new(start, end).map_err(de::Error::custom)?;

                    Ok(SlotIn { room, window })
                }
            }

            deserializer.deserialize_map(SlotVisitor)
        }
    }

    struct GroupIn(ExamGroup);

    impl<'de> Deserialize<'de> for GroupIn {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct GroupVisitor;

            impl<'de> Visitor<'de> for GroupVisitor {
                type Value = GroupIn;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter
                        .write_str("an exam group with 'students', 'room', and 'course_id' fields")
                }

                fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut students: Option<Vec<Id>> = None;
                    let mut slot: Option<SlotIn> = None;
                    let mut course: Option<Id> = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "students" => {
                                if students.is_some() {
                                    return Err(de::Error::duplicate_field("students"));
                                }
                                students = Some(map.next_value()?);
                            }
                            "room" => {
                                if slot.is_some() {
                                    return Err(de::Error::duplicate_field("room"));
                                }
                                slot = Some(map.next_value()?);
                            }
                            "course_id" => {
                                if course.is_some() {
                                    return Err(de::Error::duplicate_field("course_id"));
                                }
                                course = Some(map.next_value()?);
                            }
                            _ => {
                                let _ = map.next_value::<IgnoredAny>()?;
                            }
                        }
                    }

                    let students = students.ok_or_else(|| de::Error::missing_field("students"))?;
                    let slot = slot.ok_or_else(|| de::Error::missing_field("room"))?;
                    let course = course.ok_or_else(|| de::Error::missing_field("course_id"))?;

                    Ok(GroupIn(ExamGroup::new(course, slot.room, slot.window, students)))
                }
            }

            deserializer.deserialize_map(GroupVisitor)
        }
    }

    impl<'de> Deserialize<'de> for Schedule {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct ScheduleVisitor;

            impl<'de> Visitor<'de> for ScheduleVisitor {
                type Value = Schedule;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("a map from exam group ids to group objects")
                }

                fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut schedule = Schedule::new();
                    while let Some((id, group)) = map.next_entry::<Id, GroupIn>()? {
                        schedule.insert(id, group.0).map_err(de::Error::custom)?;
                    }
                    Ok(schedule)
                }
            }

            deserializer.deserialize_map(ScheduleVisitor)
        }
    }
}
