//! glyphreel library crate.
//!
//! Converts decoded frames into character-grid animations
//! ([`convert::ConversionPipeline`]) and plays them back with frame-accurate
//! timing ([`session::AnimationSession`]).

pub mod ascii;
pub mod cli;
pub mod config;
pub mod convert;
pub mod decode;
pub mod display;
pub mod frame;
pub mod playback;
pub mod session;
pub mod settings;
pub mod transform;
