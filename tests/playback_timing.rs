//! Playback timing tests for the animation session.
//!
//! All tests run on tokio's paused clock, so frame changes are observed at
//! exact virtual timestamps.

use glyphreel::frame::{AsciiAnimation, AsciiFrame};
use glyphreel::playback::{wait_duration, PlaybackEvent, PlaybackStatus};
use glyphreel::session::{AnimationSession, SessionCommand};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn animation(delays: &[u32]) -> AsciiAnimation {
    AsciiAnimation::new(
        delays
            .iter()
            .enumerate()
            .map(|(i, &d)| AsciiFrame::from_rows([format!("#{}", i)], 2, d))
            .collect(),
    )
    .unwrap()
}

/// Drive the session until `count` frame changes were seen, recording the
/// virtual time of each one relative to `start`.
async fn record_frames(
    session: &mut AnimationSession,
    events: &mut mpsc::UnboundedReceiver<PlaybackEvent>,
    start: Instant,
    count: usize,
) -> Vec<(usize, u64)> {
    let mut seen = Vec::new();
    while seen.len() < count {
        while let Ok(event) = events.try_recv() {
            if let PlaybackEvent::FrameChanged { index, .. } = event {
                seen.push((index, start.elapsed().as_millis() as u64));
            }
        }
        if seen.len() >= count {
            break;
        }
        session.tick().await;
    }
    seen.truncate(count);
    seen
}

// ====================
// Frame timing
// ====================

#[tokio::test(start_paused = true)]
async fn test_looping_timeline() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100, 200, 50]));
    let start = Instant::now();
    session.play();

    let seen = record_frames(&mut session, &mut events, start, 5).await;
    assert_eq!(seen, vec![(0, 0), (1, 100), (2, 300), (0, 350), (1, 450)]);
}

#[tokio::test(start_paused = true)]
async fn test_double_speed_halves_waits() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100, 200, 50]));
    session.set_speed(2.0);
    let start = Instant::now();
    session.play();

    let seen = record_frames(&mut session, &mut events, start, 4).await;
    assert_eq!(seen, vec![(0, 0), (1, 50), (2, 150), (0, 175)]);
}

#[tokio::test(start_paused = true)]
async fn test_short_delays_respect_floor() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[1, 1, 1]));
    session.set_speed(5.0);
    let start = Instant::now();
    session.play();

    let seen = record_frames(&mut session, &mut events, start, 3).await;
    assert_eq!(seen, vec![(0, 0), (1, 10), (2, 20)]);
}

// ====================
// Speed clamping
// ====================

#[test]
fn test_speed_bounds() {
    assert_eq!(wait_duration(100, 0.0), wait_duration(100, 0.1));
    assert_eq!(wait_duration(100, 100.0), wait_duration(100, 5.0));
    assert_eq!(wait_duration(100, 0.1), Duration::from_millis(1000));
    assert_eq!(wait_duration(100, 5.0), Duration::from_millis(20));
}

// ====================
// Looping and completion
// ====================

#[tokio::test(start_paused = true)]
async fn test_non_looping_finishes_once() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100, 100, 100]));
    session.set_looping(false);
    session.play();

    let mut frames = Vec::new();
    let mut finished = 0;
    while session.status() == Some(PlaybackStatus::Playing) {
        session.tick().await;
    }
    while let Ok(event) = events.try_recv() {
        match event {
            PlaybackEvent::FrameChanged { index, .. } => frames.push(index),
            PlaybackEvent::Finished => finished += 1,
        }
    }

    assert_eq!(frames, vec![0, 1, 2]);
    assert_eq!(finished, 1);
    assert_eq!(session.status(), Some(PlaybackStatus::Stopped));

    // Nothing else is scheduled
    let idle = tokio::time::timeout(Duration::from_secs(10), session.tick()).await;
    assert!(idle.is_err());
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_single_frame_animation_never_advances() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100]));
    session.play();

    let start = Instant::now();
    let seen = record_frames(&mut session, &mut events, start, 3).await;
    assert!(seen.iter().all(|(index, _)| *index == 0));
}

// ====================
// Controls
// ====================

#[tokio::test(start_paused = true)]
async fn test_stop_rewinds_and_disarms() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100, 100, 100]));
    session.play();
    session.tick().await;
    assert_eq!(session.current_index(), Some(1));

    session.stop();
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.status(), Some(PlaybackStatus::Stopped));
    while events.try_recv().is_ok() {}

    let idle = tokio::time::timeout(Duration::from_secs(5), session.tick()).await;
    assert!(idle.is_err());
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_seek_while_playing_restarts_timer() {
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation(&[100, 300, 100]));
    let start = Instant::now();
    session.play();
    let mut seen = record_frames(&mut session, &mut events, start, 1).await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    session.seek(1);
    seen.extend(record_frames(&mut session, &mut events, start, 2).await);
    // Frame 1 shown at the seek, frame 2 after its own 300 ms
    assert_eq!(seen, vec![(0, 0), (1, 60), (2, 360)]);
}

#[tokio::test(start_paused = true)]
async fn test_seek_past_end_clamps() {
    let (mut session, _events) = AnimationSession::new();
    session.load(animation(&[100, 100, 100]));
    session.seek(42);
    assert_eq!(session.current_index(), Some(2));
    assert_eq!(session.current_frame().unwrap().text(), "#2");
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume_keeps_position() {
    let (mut session, _events) = AnimationSession::new();
    session.load(animation(&[100, 100, 100]));
    session.play();
    session.tick().await;
    session.pause();
    assert_eq!(session.status(), Some(PlaybackStatus::Paused));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.current_index(), Some(1));

    session.play();
    session.tick().await;
    assert_eq!(session.current_index(), Some(2));
}

// ====================
// Command loop
// ====================

#[tokio::test(start_paused = true)]
async fn test_commands_drive_running_session() {
    let (session, mut events) = AnimationSession::new();
    let (tx, rx) = mpsc::channel(16);
    let task = tokio::spawn(session.run(rx));

    tx.send(SessionCommand::Load(animation(&[100, 100, 100, 100])))
        .await
        .unwrap();
    tx.send(SessionCommand::Seek(1)).await.unwrap();
    tx.send(SessionCommand::Seek(3)).await.unwrap();
    tx.send(SessionCommand::Pause).await.unwrap();
    tx.send(SessionCommand::Shutdown).await.unwrap();

    let session = task.await.unwrap();
    assert_eq!(session.current_index(), Some(3));
    assert_eq!(session.status(), Some(PlaybackStatus::Stopped));

    let mut shown = Vec::new();
    while let Ok(PlaybackEvent::FrameChanged { index, .. }) = events.try_recv() {
        shown.push(index);
    }
    assert_eq!(shown, vec![1, 3]);
}
