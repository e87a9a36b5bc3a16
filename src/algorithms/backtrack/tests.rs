//! Scenario suite for the backtracking engine.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::engine::order_courses;
use super::*;
use crate::algorithms::{ExamScheduler, SolveOutcome};
use crate::entities::{Course, EntityStore, Room, Student};
use crate::timeline::TimeWindow;
use crate::verify::verify;

fn at(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 6, 1)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn win(h1: u32, h2: u32) -> TimeWindow {
    TimeWindow::new(at(h1, 0), at(h2, 0)).unwrap()
}

fn course(id: &str, min_capacity: u32, hours: f64) -> Course {
    Course::new(id, min_capacity, hours).unwrap()
}

fn room(id: &str, capacity: u32, windows: Vec<TimeWindow>) -> Room {
    Room::new(id, capacity, windows).unwrap()
}

fn student(id: &str, courses: &[&str]) -> Student {
    Student::new(id, courses.iter().map(|c| c.to_string()))
}

fn store(courses: Vec<Course>, rooms: Vec<Room>, students: Vec<Student>) -> EntityStore {
    EntityStore::new(courses, rooms, students).unwrap()
}

#[test]
fn single_course_schedules_and_verifies() {
    // Course A (min capacity 10, 2h), room R1 (capacity 12, open 09-13),
    // three students enrolled only in A.
    let s = store(
        vec![course("A", 10, 2.0)],
        vec![room("R1", 12, vec![win(9, 13)])],
        vec![
            student("s1", &["A"]),
            student("s2", &["A"]),
            student("s3", &["A"]),
        ],
    );

    let outcome = BacktrackScheduler::default().schedule(&s);
    let schedule = outcome.schedule().expect("feasible instance");
    assert_eq!(schedule.len(), 1);

    let group = schedule.get("group_0001").unwrap();
    assert_eq!(group.course(), "A");
    assert_eq!(group.room(), "R1");
    assert!(win(9, 13).contains(&group.window()));
    assert_eq!(group.window().duration(), TimeDelta::hours(2));
    assert_eq!(group.students().len(), 3);

    assert!(verify(schedule, &s).unwrap().is_valid());
}

#[test]
fn independent_courses_all_schedule() {
    // Every course fits somewhere and no student takes two courses.
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 2.0), course("C", 1, 2.0)],
        vec![
            room("R1", 5, vec![win(9, 13)]),
            room("R2", 5, vec![win(9, 13)]),
            room("R3", 5, vec![win(9, 13)]),
        ],
        vec![
            student("s1", &["A"]),
            student("s2", &["B"]),
            student("s3", &["C"]),
        ],
    );

    let outcome = BacktrackScheduler::default().schedule(&s);
    let schedule = outcome.schedule().expect("trivially feasible");
    assert_eq!(schedule.len(), 3);
    assert!(verify(schedule, &s).unwrap().is_valid());
}

#[test]
fn contended_single_slot_is_infeasible() {
    // A and B both need room R1's only slot in its entirety.
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 2.0)],
        vec![room("R1", 5, vec![win(9, 11)])],
        vec![student("s1", &["A"]), student("s2", &["B"])],
    );

    assert_eq!(
        BacktrackScheduler::default().schedule(&s),
        SolveOutcome::Infeasible
    );
}

#[test]
fn shared_student_single_window_is_infeasible() {
    // One shared student, one slot: a schedule would double-book them, so
    // the engine must fail rather than emit one.
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 2.0)],
        vec![
            room("R1", 5, vec![win(9, 11)]),
            room("R2", 5, vec![win(9, 11)]),
        ],
        vec![student("shared", &["A", "B"])],
    );

    assert_eq!(
        BacktrackScheduler::default().schedule(&s),
        SolveOutcome::Infeasible
    );
}

#[test]
fn shared_student_exams_are_sequenced() {
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 2.0)],
        vec![
            room("R1", 5, vec![win(9, 13)]),
            room("R2", 5, vec![win(9, 13)]),
        ],
        vec![student("shared", &["A", "B"])],
    );

    let outcome = BacktrackScheduler::default().schedule(&s);
    let schedule = outcome.schedule().expect("sequencing is possible");
    let a = schedule.get("group_0001").unwrap().window();
    let b = schedule.get("group_0002").unwrap().window();
    assert!(!a.overlaps(&b));
    assert!(verify(schedule, &s).unwrap().is_valid());
}

#[test]
fn largest_first_reorders_the_queue() {
    let s = store(
        vec![course("small", 1, 2.0), course("big", 1, 2.0)],
        vec![room("R1", 5, vec![win(9, 17)])],
        vec![
            student("s1", &["big"]),
            student("s2", &["big"]),
            student("s3", &["small"]),
        ],
    );

    let input: Vec<_> = order_courses(&s, CourseOrder::Input)
        .iter()
        .map(|c| c.id().to_owned())
        .collect();
    assert_eq!(input, vec!["small", "big"]);

    let largest: Vec<_> = order_courses(&s, CourseOrder::LargestFirst)
        .iter()
        .map(|c| c.id().to_owned())
        .collect();
    assert_eq!(largest, vec!["big", "small"]);
}

#[test]
fn both_ordering_policies_solve_the_same_instance() {
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 1.0)],
        vec![room("R1", 5, vec![win(9, 13)])],
        vec![student("s1", &["A", "B"]), student("s2", &["A"])],
    );

    for order in [CourseOrder::Input, CourseOrder::LargestFirst] {
        let scheduler = BacktrackScheduler::new(SearchConfig {
            order,
            ..SearchConfig::default()
        });
        let outcome = scheduler.schedule(&s);
        let schedule = outcome.schedule().expect("feasible under both policies");
        assert!(verify(schedule, &s).unwrap().is_valid());
    }
}

#[test]
fn node_budget_reports_undetermined_not_infeasible() {
    // Feasible instance, but one node is not enough to prove it.
    let s = store(
        vec![course("A", 1, 2.0), course("B", 1, 2.0)],
        vec![
            room("R1", 5, vec![win(9, 13)]),
            room("R2", 5, vec![win(9, 13)]),
        ],
        vec![student("s1", &["A"]), student("s2", &["B"])],
    );

    let scheduler = BacktrackScheduler::new(SearchConfig {
        max_nodes: Some(1),
        ..SearchConfig::default()
    });
    match scheduler.schedule(&s) {
        SolveOutcome::BudgetExceeded { nodes_visited } => assert!(nodes_visited > 1),
        other => panic!("expected budget exhaustion, got {other:?}"),
    }
}

#[test]
fn zero_deadline_aborts_immediately() {
    let s = store(
        vec![course("A", 1, 2.0)],
        vec![room("R1", 5, vec![win(9, 13)])],
        vec![student("s1", &["A"])],
    );

    let scheduler = BacktrackScheduler::new(SearchConfig {
        time_limit: Some(Duration::ZERO),
        ..SearchConfig::default()
    });
    assert!(matches!(
        scheduler.schedule(&s),
        SolveOutcome::BudgetExceeded { .. }
    ));
}

#[test]
fn course_without_students_needs_no_sitting() {
    // "empty" would demand a 20-seat room that does not exist; with nobody
    // enrolled it must not block the course that can be scheduled.
    let s = store(
        vec![course("empty", 20, 2.0), course("A", 1, 2.0)],
        vec![room("R1", 5, vec![win(9, 13)])],
        vec![student("s1", &["A"])],
    );

    let outcome = BacktrackScheduler::default().schedule(&s);
    let schedule = outcome.schedule().expect("only A needs a slot");
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule.get("group_0001").unwrap().course(), "A");
    assert!(verify(schedule, &s).unwrap().is_valid());
}

#[derive(Default)]
struct TraceObserver {
    commits: Vec<(String, String)>,
    backtracks: Vec<String>,
}

impl SearchObserver for TraceObserver {
    fn on_commit(&mut self, course: &str, option: &CandidateOption) {
        self.commits.push((course.to_owned(), option.room.clone()));
    }

    fn on_backtrack(&mut self, course: &str) {
        self.backtracks.push(course.to_owned());
    }
}

#[test]
fn observer_sees_commits_and_backtracks() {
    // A fits in either room; B only fits in R1. The engine tries A in R1
    // first (identifier order), dooming B, and must backtrack once.
    let s = store(
        vec![course("A", 1, 2.0), course("B", 5, 2.0)],
        vec![
            room("R1", 10, vec![win(9, 11)]),
            room("R2", 4, vec![win(9, 11)]),
        ],
        vec![student("s1", &["A"]), student("s2", &["B"])],
    );

    let mut trace = TraceObserver::default();
    let outcome = BacktrackScheduler::default().solve_with_observer(&s, &mut trace);
    assert!(outcome.is_solved());

    assert_eq!(
        trace.commits,
        vec![
            ("A".to_owned(), "R1".to_owned()),
            ("A".to_owned(), "R2".to_owned()),
            ("B".to_owned(), "R1".to_owned()),
        ]
    );
    assert_eq!(trace.backtracks, vec!["A".to_owned()]);
}

#[test]
fn every_solved_random_instance_verifies_clean() {
    // Soundness law: whatever the engine accepts, the verifier accepts too.
    for seed in 0..10u64 {
        let mut rng = StdRng::seed_from_u64(seed);

        let n_rooms = rng.gen_range(2..=4);
        let rooms: Vec<Room> = (0..n_rooms)
            .map(|i| {
                room(
                    &format!("R{i}"),
                    rng.gen_range(5..=30),
                    vec![win(9, 17)],
                )
            })
            .collect();

        let n_courses = rng.gen_range(3..=6);
        let courses: Vec<Course> = (0..n_courses)
            .map(|i| {
                course(
                    &format!("C{i}"),
                    rng.gen_range(1..=5),
                    rng.gen_range(1..=3) as f64,
                )
            })
            .collect();

        let students: Vec<Student> = (0..rng.gen_range(10..=25))
            .map(|i| {
                let enrolled: Vec<String> = (0..n_courses)
                    .filter(|_| rng.gen_bool(0.3))
                    .map(|c| format!("C{c}"))
                    .collect();
                Student::new(format!("s{i}"), enrolled)
            })
            .collect();

        let s = store(courses, rooms, students);
        let scheduler = BacktrackScheduler::new(SearchConfig {
            max_nodes: Some(200_000),
            ..SearchConfig::default()
        });

        if let SolveOutcome::Solved(schedule) = scheduler.schedule(&s) {
            let report = verify(&schedule, &s).unwrap();
            assert!(
                report.is_valid(),
                "seed {seed} produced violations: {:?}",
                report.violations()
            );
        }
    }
}
