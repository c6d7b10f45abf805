//! End-to-end workout sessions over the on-disk session log.
//!
//! Each test drives a `WorkoutRunner` tick by tick against a SQLite file in
//! a temporary directory, then reopens the file to check what an athlete
//! would see in their history.

use emom_core::cue::{Cue, RecordingCues};
use emom_core::ids::{FixedClock, SequentialIds};
use emom_core::timer::progress;
use emom_core::{
    Database, Event, Phase, SessionLog, SessionStatus, Variant, WorkoutConfig, WorkoutRunner,
};
use tempfile::TempDir;

fn runner(dir: &TempDir, variant: Variant, rounds: u32) -> (WorkoutRunner, RecordingCues) {
    let db = Database::open_at(&dir.path().join("emom.db")).unwrap();
    let cues = RecordingCues::new();
    let runner = WorkoutRunner::new(WorkoutConfig::new(variant, rounds).unwrap(), Box::new(db))
        .with_cues(cues.clone())
        .with_ids(SequentialIds::new("w"))
        .with_clock(FixedClock::at(2026, 10, 18, 6, 45));
    (runner, cues)
}

fn reopen(dir: &TempDir) -> Database {
    Database::open_at(&dir.path().join("emom.db")).unwrap()
}

fn tick_n(runner: &mut WorkoutRunner, n: u32) -> Vec<Event> {
    (0..n).flat_map(|_| runner.tick()).collect()
}

#[test]
fn emom_three_rounds_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let (mut runner, cues) = runner(&dir, Variant::Emom, 3);

    runner.start();
    tick_n(&mut runner, 5);
    let s = runner.snapshot();
    assert_eq!(s.phase, Phase::Running);
    assert_eq!((s.current_round, s.target_rounds, s.seconds_left_in_round), (1, 3, 60));

    tick_n(&mut runner, 60);
    let s = runner.snapshot();
    assert_eq!((s.current_round, s.seconds_left_in_round), (2, 60));
    assert_eq!(runner.log().list().unwrap()[0].actual_minutes, 1);

    tick_n(&mut runner, 60);
    assert_eq!(runner.snapshot().current_round, 3);
    assert_eq!(runner.log().list().unwrap()[0].actual_minutes, 2);

    let events = tick_n(&mut runner, 60);
    assert_eq!(runner.phase(), Phase::Idle);
    assert!(runner.finished_pending());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::WorkoutCompleted { .. }))
            .count(),
        1
    );
    assert_eq!(cues.count(Cue::Final), 1);
    drop(runner);

    let history = reopen(&dir).list().unwrap();
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert_eq!(record.id, "w-1");
    assert_eq!(record.title, "EMOM - 1");
    assert_eq!(record.date, "2026-10-18");
    assert_eq!(record.start_time, "06:45");
    assert_eq!(record.status, SessionStatus::Completed);
    assert_eq!(record.target_minutes, 3);
    assert_eq!(record.actual_minutes, 3);
}

#[test]
fn quit_thirty_seconds_into_first_round() {
    let dir = tempfile::tempdir().unwrap();
    let (mut runner, _) = runner(&dir, Variant::Emom, 3);

    runner.start();
    tick_n(&mut runner, 5 + 30);
    assert_eq!(runner.snapshot().seconds_left_in_round, 30);
    runner.quit();
    assert_eq!(runner.phase(), Phase::Idle);
    assert!(!runner.finished_pending());
    drop(runner);

    let record = &reopen(&dir).list().unwrap()[0];
    assert_eq!(record.status, SessionStatus::Interrupted);
    assert_eq!(record.actual_minutes, 0);
}

#[test]
fn pause_holds_the_clock_across_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let (mut runner, _) = runner(&dir, Variant::E5mom, 2);

    runner.start();
    tick_n(&mut runner, 5 + 42);
    let before = runner.snapshot();
    runner.pause();
    assert!(!runner.is_ticking());
    assert!(tick_n(&mut runner, 100).is_empty());
    runner.resume();
    let after = runner.snapshot();
    assert_eq!(after.seconds_left_in_round, before.seconds_left_in_round);
    assert_eq!(after.phase, Phase::Running);
    assert!((progress(&after) - 42.0 / 300.0).abs() < 1e-9);
}

#[test]
fn history_accumulates_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (mut runner, _) = runner(&dir, Variant::E2mom, 1);
        runner.start();
        tick_n(&mut runner, 5 + 120);
    }
    {
        let db = reopen(&dir);
        let mut runner = WorkoutRunner::new(
            WorkoutConfig::new(Variant::Emom, 4).unwrap(),
            Box::new(db),
        )
        .with_ids(SequentialIds::new("x"));
        runner.start();
        tick_n(&mut runner, 5 + 130);
        runner.quit();
    }

    let db = reopen(&dir);
    let history = db.list().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].title, "EMOM - 2");
    assert_eq!(history[0].actual_minutes, 2);
    assert_eq!(history[1].title, "E2MOM - 1");

    let summary = db.summary().unwrap();
    assert_eq!(summary.total_sessions, 2);
    assert_eq!(summary.completed_sessions, 1);
    assert_eq!(summary.total_actual_minutes, 4);
}
