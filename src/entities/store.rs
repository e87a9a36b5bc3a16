use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};

use super::{Course, InvalidInput, Room, Student};
use crate::Id;

/// Read-only snapshot of all course, room, and student facts for one run.
///
/// Built once at startup and passed by reference through candidate
/// generation, search, and verification; nothing mutates it afterwards.
/// Construction validates every cross-record invariant up front, derives
/// per-course rosters from the student records, and precomputes the
/// course-conflict graph consulted by the consistency check.
///
/// # Invariants
///
/// - Identifiers are unique within each entity kind
/// - Every enrollment references a known course
/// - Rooms are sorted by identifier (and each room's windows by start time),
///   so candidate enumeration order is deterministic
#[derive(Debug, Clone)]
pub struct EntityStore {
    courses: Vec<Course>,
    rooms: Vec<Room>,
    students: Vec<Student>,
    course_index: HashMap<Id, usize>,
    room_index: HashMap<Id, usize>,
    student_index: HashMap<Id, usize>,
    rosters: HashMap<Id, BTreeSet<Id>>,
    /// One node per course; an edge carries the number of shared students.
    conflicts: UnGraph<Id, u32>,
    conflict_nodes: HashMap<Id, NodeIndex>,
}

impl EntityStore {
    pub fn new(
        courses: Vec<Course>,
        mut rooms: Vec<Room>,
        students: Vec<Student>,
    ) -> Result<Self, InvalidInput> {
        let mut course_index = HashMap::new();
        for (i, course) in courses.iter().enumerate() {
            if course_index.insert(course.id().to_owned(), i).is_some() {
                return Err(InvalidInput::DuplicateCourse(course.id().to_owned()));
            }
        }

        rooms.sort_by(|a, b| a.id().cmp(b.id()));
        let mut room_index = HashMap::new();
        for (i, room) in rooms.iter().enumerate() {
            if room_index.insert(room.id().to_owned(), i).is_some() {
                return Err(InvalidInput::DuplicateRoom(room.id().to_owned()));
            }
        }

        let mut student_index = HashMap::new();
        for (i, student) in students.iter().enumerate() {
            if student_index.insert(student.id().to_owned(), i).is_some() {
                return Err(InvalidInput::DuplicateStudent(student.id().to_owned()));
            }
        }

        let mut rosters: HashMap<Id, BTreeSet<Id>> = courses
            .iter()
            .map(|c| (c.id().to_owned(), BTreeSet::new()))
            .collect();
        for student in &students {
            for course in student.enrolled_courses() {
                let Some(roster) = rosters.get_mut(course) else {
                    return Err(InvalidInput::UnknownCourse {
                        student: student.id().to_owned(),
                        course: course.clone(),
                    });
                };
                roster.insert(student.id().to_owned());
            }
        }

        let mut conflicts = UnGraph::new_undirected();
        let conflict_nodes: HashMap<Id, NodeIndex> = courses
            .iter()
            .map(|c| (c.id().to_owned(), conflicts.add_node(c.id().to_owned())))
            .collect();
        for student in &students {
            let enrolled: Vec<&Id> = student.enrolled_courses().iter().collect();
            for (i, a) in enrolled.iter().enumerate() {
                for b in &enrolled[i + 1..] {
                    let (na, nb) = (conflict_nodes[*a], conflict_nodes[*b]);
                    match conflicts.find_edge(na, nb) {
                        Some(edge) => {
                            if let Some(weight) = conflicts.edge_weight_mut(edge) {
                                *weight += 1;
                            }
                        }
                        None => {
                            conflicts.add_edge(na, nb, 1);
                        }
                    }
                }
            }
        }

        Ok(Self {
            courses,
            rooms,
            students,
            course_index,
            room_index,
            student_index,
            rosters,
            conflicts,
            conflict_nodes,
        })
    }

    /// Courses in input order (the default search order).
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Rooms sorted by identifier.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.course_index.get(id).map(|&i| &self.courses[i])
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.student_index.get(id).map(|&i| &self.students[i])
    }

    /// The set of students enrolled in a course, derived from the student
    /// records at construction time.
    pub fn enrolled_students(&self, course: &str) -> Option<&BTreeSet<Id>> {
        self.rosters.get(course)
    }

    /// Number of students enrolled in both courses. Zero for unknown ids.
    pub fn shared_students(&self, a: &str, b: &str) -> u32 {
        let (Some(&na), Some(&nb)) = (self.conflict_nodes.get(a), self.conflict_nodes.get(b))
        else {
            return 0;
        };
        self.conflicts
            .find_edge(na, nb)
            .and_then(|e| self.conflicts.edge_weight(e))
            .copied()
            .unwrap_or(0)
    }

    /// True if scheduling the two courses at overlapping times would give
    /// some student two simultaneous exams.
    pub fn courses_conflict(&self, a: &str, b: &str) -> bool {
        self.shared_students(a, b) > 0
    }
}
