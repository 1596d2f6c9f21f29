//! Animation session: one loaded animation plus its playback state.
//!
//! This is the surface external consumers talk to. Calls can be made
//! directly on an [`AnimationSession`], or sent as [`SessionCommand`]s to
//! [`AnimationSession::run`], the session's cooperative event loop.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::frame::{AsciiAnimation, AsciiFrame};
use crate::playback::{PlaybackEvent, PlaybackScheduler, PlaybackStatus};

/// Requests accepted by [`AnimationSession::run`].
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Replace the animation with a freshly converted one
    Load(AsciiAnimation),
    Play,
    Pause,
    /// Pause if playing, otherwise play
    TogglePlay,
    Stop,
    Seek(usize),
    SetSpeed(f32),
    SetLooping(bool),
    /// Leave the event loop
    Shutdown,
}

/// Owns at most one animation and its scheduler.
///
/// Without an animation every playback call is a no-op.
#[derive(Debug)]
pub struct AnimationSession {
    scheduler: Option<PlaybackScheduler>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl AnimationSession {
    /// Create an empty session and the receiver for its playback events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            Self {
                scheduler: None,
                events,
            },
            rx,
        )
    }

    /// Replace the animation and reset playback (stopped, frame 0, looping,
    /// speed 1.0). The old state is dropped, along with its pending wake.
    pub fn load(&mut self, animation: AsciiAnimation) {
        log::info!(
            "Loading animation: {} frame(s), {} ms",
            animation.len(),
            animation.total_duration_ms()
        );
        let scheduler = PlaybackScheduler::new(Arc::new(animation), self.events.clone());
        self.scheduler = Some(scheduler);
    }

    /// Drop the animation and its playback state.
    pub fn close(&mut self) {
        self.scheduler = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.scheduler.is_some()
    }

    pub fn play(&mut self) {
        if let Some(s) = &mut self.scheduler {
            s.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(s) = &mut self.scheduler {
            s.pause();
        }
    }

    pub fn toggle_play(&mut self) {
        match self.status() {
            Some(PlaybackStatus::Playing) => self.pause(),
            Some(_) => self.play(),
            None => {}
        }
    }

    pub fn stop(&mut self) {
        if let Some(s) = &mut self.scheduler {
            s.stop();
        }
    }

    pub fn seek(&mut self, index: usize) {
        if let Some(s) = &mut self.scheduler {
            s.seek(index);
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        if let Some(s) = &mut self.scheduler {
            s.set_speed(speed);
        }
    }

    pub fn set_looping(&mut self, looping: bool) {
        if let Some(s) = &mut self.scheduler {
            s.set_looping(looping);
        }
    }

    /// Number of frames in the loaded animation, 0 when empty.
    pub fn frame_count(&self) -> usize {
        self.scheduler.as_ref().map_or(0, |s| s.frame_count())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.scheduler.as_ref().map(|s| s.current_index())
    }

    pub fn current_frame(&self) -> Option<&AsciiFrame> {
        self.scheduler.as_ref().and_then(|s| s.current_frame())
    }

    pub fn status(&self) -> Option<PlaybackStatus> {
        self.scheduler.as_ref().map(|s| s.status())
    }

    pub fn speed(&self) -> Option<f32> {
        self.scheduler.as_ref().map(|s| s.speed())
    }

    pub fn is_looping(&self) -> Option<bool> {
        self.scheduler.as_ref().map(|s| s.is_looping())
    }

    /// Wait for the scheduler's pending wake and advance.
    ///
    /// Never resolves while nothing is playing.
    pub async fn tick(&mut self) {
        match &mut self.scheduler {
            Some(s) => s.tick().await,
            None => std::future::pending::<()>().await,
        }
    }

    /// Apply one command. Returns false for [`SessionCommand::Shutdown`].
    pub fn apply(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Load(animation) => self.load(animation),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::TogglePlay => self.toggle_play(),
            SessionCommand::Stop => self.stop(),
            SessionCommand::Seek(index) => self.seek(index),
            SessionCommand::SetSpeed(speed) => self.set_speed(speed),
            SessionCommand::SetLooping(looping) => self.set_looping(looping),
            SessionCommand::Shutdown => return false,
        }
        true
    }

    /// Event loop: handle commands and timer wakes until shutdown or until
    /// every command sender is dropped.
    ///
    /// Commands are applied in order, so of two back-to-back seeks only the
    /// second one is visible once the loop waits again.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Self {
        loop {
            tokio::select! {
                maybe_command = commands.recv() => {
                    match maybe_command {
                        Some(command) => {
                            if !self.apply(command) {
                                log::debug!("Session shutdown requested");
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = self.tick() => {}
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animation(delays: &[u32]) -> AsciiAnimation {
        AsciiAnimation::new(
            delays
                .iter()
                .enumerate()
                .map(|(i, &d)| AsciiFrame::from_rows([format!("frame{}", i)], 6, d))
                .collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_session_is_noop() {
        let (mut session, mut rx) = AnimationSession::new();
        session.play();
        session.seek(3);
        session.stop();
        session.toggle_play();
        assert_eq!(session.frame_count(), 0);
        assert!(session.current_frame().is_none());
        assert!(session.status().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_resets_state() {
        let (mut session, _rx) = AnimationSession::new();
        session.load(animation(&[100, 100, 100]));
        session.set_speed(3.0);
        session.set_looping(false);
        session.play();
        session.seek(2);

        session.load(animation(&[50, 50]));
        assert_eq!(session.frame_count(), 2);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.status(), Some(PlaybackStatus::Stopped));
        assert_eq!(session.speed(), Some(1.0));
        assert_eq!(session.is_looping(), Some(true));
        assert_eq!(session.current_frame().unwrap().text(), "frame0");
    }

    #[tokio::test]
    async fn test_toggle_play() {
        let (mut session, _rx) = AnimationSession::new();
        session.load(animation(&[100, 100]));
        session.toggle_play();
        assert_eq!(session.status(), Some(PlaybackStatus::Playing));
        session.toggle_play();
        assert_eq!(session.status(), Some(PlaybackStatus::Paused));
    }

    #[tokio::test]
    async fn test_close_drops_animation() {
        let (mut session, _rx) = AnimationSession::new();
        session.load(animation(&[100]));
        session.close();
        assert!(!session.is_loaded());
        assert_eq!(session.frame_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_plays_until_shutdown() {
        let (session, mut events) = AnimationSession::new();
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(session.run(rx));

        tx.send(SessionCommand::Load(animation(&[100, 100, 100]))).await.unwrap();
        tx.send(SessionCommand::SetLooping(false)).await.unwrap();
        tx.send(SessionCommand::Play).await.unwrap();

        let mut shown = Vec::new();
        loop {
            match events.recv().await.unwrap() {
                PlaybackEvent::FrameChanged { index, .. } => shown.push(index),
                PlaybackEvent::Finished => break,
            }
        }
        assert_eq!(shown, vec![0, 1, 2]);

        tx.send(SessionCommand::Shutdown).await.unwrap();
        let session = task.await.unwrap();
        assert_eq!(session.status(), Some(PlaybackStatus::Stopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_exits_when_senders_drop() {
        let (session, _events) = AnimationSession::new();
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        let session = session.run(rx).await;
        assert!(!session.is_loaded());
    }
}
