//! Frame-accurate playback of converted animations.

mod scheduler;

pub use scheduler::{
    clamp_speed, wait_duration, PlaybackEvent, PlaybackScheduler, PlaybackStatus, DEFAULT_SPEED,
    MAX_SPEED, MIN_SPEED, MIN_WAIT_MS,
};
