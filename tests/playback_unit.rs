//! Unit tests for the playback scheduler.

use ascii_reel::playback::{PlaybackScheduler, Selection};

fn index(selection: Option<Selection>) -> Option<usize> {
    selection.map(|s| s.index)
}

#[test]
fn test_large_gap_wraps_when_looping() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, true);
    assert_eq!(index(scheduler.tick(0.0)), Some(0));
    // 10 frames elapsed: 10 mod 5 = 0
    assert_eq!(
        scheduler.tick(1000.0),
        Some(Selection {
            index: 0,
            stopped: false
        })
    );
    assert!(scheduler.is_playing());
}

#[test]
fn test_advances_one_frame_per_interval() {
    let mut scheduler = PlaybackScheduler::new(10, 10.0, true);
    scheduler.tick(0.0);
    assert_eq!(index(scheduler.tick(100.0)), Some(1));
    assert_eq!(index(scheduler.tick(150.0)), None);
    assert_eq!(index(scheduler.tick(200.0)), Some(2));
}

#[test]
fn test_late_ticks_do_not_drift() {
    let mut scheduler = PlaybackScheduler::new(10, 10.0, true);
    scheduler.tick(0.0);
    // 50 ms late; the anchor keeps the remainder
    assert_eq!(index(scheduler.tick(150.0)), Some(1));
    assert_eq!(index(scheduler.tick(200.0)), Some(2));
    assert_eq!(index(scheduler.tick(290.0)), None);
    assert_eq!(index(scheduler.tick(300.0)), Some(3));
}

#[test]
fn test_catches_up_in_one_step() {
    let mut scheduler = PlaybackScheduler::new(10, 10.0, true);
    scheduler.tick(0.0);
    assert_eq!(index(scheduler.tick(350.0)), Some(3));
    assert_eq!(scheduler.current_frame(), 3);
}

#[test]
fn test_wraps_past_last_frame() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, true);
    scheduler.tick(0.0);
    assert_eq!(index(scheduler.tick(450.0)), Some(4));
    assert_eq!(index(scheduler.tick(550.0)), Some(0));
}

#[test]
fn test_stops_at_end_without_loop() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, false);
    scheduler.tick(0.0);
    assert_eq!(
        scheduler.tick(1000.0),
        Some(Selection {
            index: 4,
            stopped: true
        })
    );
    assert!(!scheduler.is_playing());
    assert_eq!(scheduler.tick(2000.0), None);
}

#[test]
fn test_landing_on_last_frame_stops() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, false);
    scheduler.tick(0.0);
    assert_eq!(
        scheduler.tick(300.0),
        Some(Selection {
            index: 3,
            stopped: false
        })
    );
    assert_eq!(
        scheduler.tick(400.0),
        Some(Selection {
            index: 4,
            stopped: true
        })
    );
}

#[test]
fn test_paused_emits_nothing() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, true);
    scheduler.tick(0.0);
    scheduler.pause();
    assert!(!scheduler.is_playing());
    assert_eq!(scheduler.tick(500.0), None);
    assert_eq!(scheduler.current_frame(), 0);
}

#[test]
fn test_resume_reanchors() {
    let mut scheduler = PlaybackScheduler::new(5, 10.0, true);
    scheduler.tick(0.0);
    assert_eq!(index(scheduler.tick(200.0)), Some(2));
    scheduler.pause();
    scheduler.resume();

    // Time spent paused is not caught up
    assert_eq!(index(scheduler.tick(5000.0)), Some(2));
    assert_eq!(index(scheduler.tick(5100.0)), Some(3));
}

#[test]
fn test_set_fps_changes_frame_duration() {
    let mut scheduler = PlaybackScheduler::new(10, 10.0, true);
    scheduler.set_fps(25.0);
    assert_eq!(scheduler.frame_duration_ms(), 40.0);
    scheduler.tick(0.0);
    assert_eq!(index(scheduler.tick(80.0)), Some(2));
}

#[test]
fn test_restart_after_stop() {
    let mut scheduler = PlaybackScheduler::new(3, 10.0, false);
    scheduler.tick(0.0);
    scheduler.tick(500.0);
    assert!(!scheduler.is_playing());

    scheduler.seek(0);
    scheduler.resume();
    assert_eq!(index(scheduler.tick(600.0)), Some(0));
    assert_eq!(index(scheduler.tick(700.0)), Some(1));
}
