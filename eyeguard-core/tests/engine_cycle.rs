mod common;

use common::{leads, minutes, Harness, ViewCall};
use eyeguard_core::{StepKind, SystemConstants};
use std::time::Duration;

#[test]
fn fifty_minute_cycle_visits_every_step_once() {
    let mut h = Harness::new(minutes(50, 10), SystemConstants::default());
    h.run(3600 + 1);

    let runs = h.recorder.runs();
    assert_eq!(
        runs,
        vec![
            (StepKind::Working, 2940),
            (StepKind::Notify1, 55),
            (StepKind::Notify2, 5),
            (StepKind::Break, 600),
            (StepKind::Working, 1),
        ]
    );
    let work_ticks: usize = runs[..3].iter().map(|(_, n)| n).sum();
    assert_eq!(work_ticks, 50 * 60);
    assert_eq!(h.clock.slept(), Duration::from_secs(3601));
}

#[test]
fn one_minute_cycle_lasts_two_minutes() {
    let mut h = Harness::new(minutes(1, 1), leads(0, 5));
    let table = h.engine.durations();
    assert_eq!(table[StepKind::Working], Duration::from_secs(55));
    assert_eq!(table[StepKind::Notify1], Duration::ZERO);
    assert_eq!(table[StepKind::Notify2], Duration::from_secs(5));
    assert_eq!(table[StepKind::Break], Duration::from_secs(60));

    h.run(120);
    assert_eq!(
        h.recorder.runs(),
        vec![
            (StepKind::Working, 55),
            (StepKind::Notify2, 5),
            (StepKind::Break, 60),
        ]
    );

    // The next iteration starts the second cycle.
    h.run(1);
    let last = h.recorder.last().unwrap();
    assert_eq!(last.step_kind, StepKind::Working);
    assert_eq!(last.elapsed, Duration::ZERO);
}

#[test]
fn zero_length_warning_is_entered_without_a_popup() {
    let mut h = Harness::new(minutes(1, 1), leads(0, 5));
    h.run(56);

    let notes = h.view.notifications();
    assert_eq!(notes, vec!["Break in 5 seconds"]);
    assert!(h.view.calls().contains(&ViewCall::SettingsView(StepKind::Notify1)));
    assert_eq!(h.kind(), StepKind::Notify2);
}

#[test]
fn warnings_are_silent_when_notifications_are_off() {
    let mut settings = minutes(1, 1);
    settings.notifications = eyeguard_core::Switch::Off;
    let mut h = Harness::new(settings, leads(30, 5));
    h.run(61);

    assert!(h.view.notifications().is_empty());
    assert_eq!(h.kind(), StepKind::Break);
}

#[test]
fn break_shows_overlay_and_working_hides_it() {
    let mut h = Harness::new(minutes(1, 1), leads(0, 5));
    h.run(61);
    assert_eq!(h.kind(), StepKind::Break);
    assert_eq!(h.view.count(|c| *c == ViewCall::ShowBreak), 1);
    assert!(h.view.calls().contains(&ViewCall::UpdateBreak {
        remaining: Duration::from_secs(60),
        progress: 0.0,
    }));

    h.run(60);
    assert_eq!(h.kind(), StepKind::Working);
    // Once when the engine starts in `working`, once after the break.
    assert_eq!(h.view.count(|c| *c == ViewCall::HideBreak), 2);
}

#[test]
fn break_ticks_update_the_overlay_not_the_status() {
    let mut h = Harness::new(minutes(1, 1), leads(0, 5));
    h.run(61);
    h.view.clear();
    h.run(10);

    assert_eq!(
        h.view.count(|c| matches!(c, ViewCall::UpdateBreak { .. })),
        10
    );
    assert_eq!(h.view.count(|c| matches!(c, ViewCall::Status { .. })), 0);
    let last_progress = h
        .view
        .calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            ViewCall::UpdateBreak { progress, .. } => Some(*progress),
            _ => None,
        })
        .unwrap();
    assert!((last_progress - 10.0 / 60.0).abs() < 1e-9);
}

#[test]
fn working_ticks_update_status_and_tray() {
    let mut h = Harness::new(minutes(50, 10), SystemConstants::default());
    h.run(61);

    let calls = h.view.calls();
    assert!(calls.contains(&ViewCall::Tray {
        tooltip: "Time until break: 00:49:00".to_string(),
        kind: StepKind::Working,
    }));
    let status = calls
        .iter()
        .rev()
        .find_map(|c| match c {
            ViewCall::Status { remaining, .. } => Some(*remaining),
            _ => None,
        })
        .unwrap();
    assert_eq!(status, Duration::from_secs(49 * 60));
}

#[test]
fn refresh_cadence_thins_status_updates_only() {
    let mut h =
        Harness::new(minutes(50, 10), SystemConstants::default()).with_cadence(10);
    h.run(30);

    assert_eq!(h.view.count(|c| matches!(c, ViewCall::Status { .. })), 3);
    assert_eq!(h.elapsed_secs(), 30);
}

#[test]
fn elapsed_grows_one_tick_per_iteration_within_a_step() {
    let mut h = Harness::new(minutes(1, 1), leads(10, 5));
    h.run(50);
    h.engine.handle().take_break_now();
    h.run(20);
    h.engine.handle().toggle_protection();
    h.run(5);

    let snapshots = h.recorder.snapshots();
    for pair in snapshots.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if b.elapsed < a.elapsed || b.step_kind != a.step_kind {
            // Only a transition may move elapsed back, and it restarts at zero.
            assert_eq!(b.elapsed, Duration::ZERO);
        } else {
            assert_eq!(b.elapsed - a.elapsed, Duration::from_secs(1));
        }
    }
}
