//! Single-timer cooperative playback scheduler.
//!
//! The scheduler owns at most one pending wake, stored as a deadline.
//! Arming a wake replaces the previous one; pause, stop and seek clear it
//! before anything is re-armed. [`PlaybackScheduler::tick`] sleeps until
//! the deadline and runs one advance step, so it is the only suspension
//! point and is safe to race in `tokio::select!`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::frame::{AsciiAnimation, AsciiFrame};

pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 5.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Lower bound for any wait, whatever the speed.
pub const MIN_WAIT_MS: u64 = 10;

/// Playback state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

/// Notifications sent to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A frame is now displayed
    FrameChanged { index: usize, text: String },
    /// A non-looping run reached its last frame
    Finished,
}

/// Clamp a speed multiplier to `[0.1, 5.0]`. NaN resets to 1.0.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return DEFAULT_SPEED;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Wait before advancing past a frame: `max(10, round(delay_ms / speed))`.
pub fn wait_duration(delay_ms: u32, speed: f32) -> Duration {
    let ms = (delay_ms as f64 / clamp_speed(speed) as f64).round() as u64;
    Duration::from_millis(ms.max(MIN_WAIT_MS))
}

/// Timer-driven frame advance over one animation.
#[derive(Debug)]
pub struct PlaybackScheduler {
    animation: Arc<AsciiAnimation>,
    index: usize,
    status: PlaybackStatus,
    looping: bool,
    speed: f32,
    wake: Option<Instant>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackScheduler {
    /// Fresh state: stopped at frame 0, looping, normal speed.
    pub fn new(animation: Arc<AsciiAnimation>, events: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self {
            animation,
            index: 0,
            status: PlaybackStatus::Stopped,
            looping: true,
            speed: DEFAULT_SPEED,
            wake: None,
            events,
        }
    }

    /// Start or resume from the current frame.
    ///
    /// Shows the current frame immediately. Does not rewind; call
    /// [`stop`](Self::stop) first to restart from frame 0.
    pub fn play(&mut self) {
        if self.status == PlaybackStatus::Playing || self.animation.is_empty() {
            return;
        }
        self.status = PlaybackStatus::Playing;
        self.emit_current();
        self.arm();
    }

    /// Freeze on the current frame.
    pub fn pause(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        self.disarm();
        self.status = PlaybackStatus::Paused;
    }

    /// Stop and rewind to frame 0.
    pub fn stop(&mut self) {
        self.disarm();
        self.status = PlaybackStatus::Stopped;
        self.index = 0;
        self.emit_current();
    }

    /// Jump to `index` (clamped). While playing, the wait restarts from the
    /// new frame's delay.
    pub fn seek(&mut self, index: usize) {
        if self.animation.is_empty() {
            return;
        }
        self.disarm();
        self.index = index.min(self.animation.len() - 1);
        self.emit_current();
        if self.status == PlaybackStatus::Playing {
            self.arm();
        }
    }

    /// Set the speed multiplier (clamped to 0.1..=5.0).
    ///
    /// An already armed wait keeps its deadline; the new speed applies from
    /// the next wait on.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Run one advance step, as if the pending wake fired now.
    ///
    /// No-op unless playing.
    pub fn advance(&mut self) {
        if self.status != PlaybackStatus::Playing {
            return;
        }
        self.disarm();

        let next = self.index + 1;
        if next >= self.animation.len() {
            if self.looping {
                self.index = 0;
            } else {
                self.status = PlaybackStatus::Stopped;
                log::debug!("Playback finished at frame {}", self.index);
                self.emit(PlaybackEvent::Finished);
                return;
            }
        } else {
            self.index = next;
        }

        self.emit_current();
        self.arm();
    }

    /// Sleep until the pending wake, then advance.
    ///
    /// Never resolves while no wake is armed. Dropping the future before it
    /// resolves leaves the state untouched.
    pub async fn tick(&mut self) {
        match self.wake {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.advance();
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Deadline of the single pending wake, if one is armed.
    pub fn pending_wake(&self) -> Option<Instant> {
        self.wake
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_frame(&self) -> Option<&AsciiFrame> {
        self.animation.frame(self.index)
    }

    pub fn frame_count(&self) -> usize {
        self.animation.len()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn animation(&self) -> &Arc<AsciiAnimation> {
        &self.animation
    }

    fn arm(&mut self) {
        let Some(frame) = self.animation.frame(self.index) else {
            return;
        };
        let wait = wait_duration(frame.delay_ms(), self.speed);
        self.wake = Some(Instant::now() + wait);
    }

    fn disarm(&mut self) {
        self.wake = None;
    }

    fn emit_current(&self) {
        if let Some(frame) = self.animation.frame(self.index) {
            self.emit(PlaybackEvent::FrameChanged {
                index: self.index,
                text: frame.text().to_string(),
            });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // A consumer that hung up just stops receiving
        let _ = self.events.send(event);
    }
}
