//! Conversion pipeline: source frames to an [`AsciiAnimation`].
//!
//! Per frame:
//!
//! 1. Optional background removal (fails soft)
//! 2. Adjustments from [`crate::transform`]
//! 3. Resample to `columns` x `rows`, with `rows` from [`grid_rows`]
//! 4. BT.601 grayscale per cell
//! 5. Glyph mapping through the settings' ramp
//!
//! When the settings carry no ramp, steps 3-5 (and the tonal adjustments)
//! are handed to a [`FrameRenderer`] instead.
//!
//! A run is all-or-nothing: a failing frame or a cancellation discards
//! everything converted so far.

mod error;
mod renderer;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use error::ConversionError;
pub use renderer::{
    strip_ansi, AnsiColorRenderer, BackgroundRemover, CollaboratorError, FrameRenderer, COLOR_RAMP,
};
pub use worker::ConversionHandle;

use crate::ascii::{
    grid_rows, grid_to_lines, map_to_chars, resize_to_grid, to_grayscale, MAX_GRID_ROWS,
};
use crate::frame::{AsciiAnimation, AsciiFrame, RawFrame};
use crate::settings::{AspectMode, ConversionSettings};
use crate::transform;

/// Progress report emitted after each converted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub frames_done: usize,
    pub frames_total: usize,
}

impl Progress {
    /// Completed share in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.frames_total == 0 {
            return 1.0;
        }
        self.frames_done as f32 / self.frames_total as f32
    }
}

/// Cooperative cancellation flag, checked between frames.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Converts source frames with one set of settings.
pub struct ConversionPipeline {
    settings: ConversionSettings,
    renderer: Box<dyn FrameRenderer>,
    background: Option<Box<dyn BackgroundRemover>>,
}

impl ConversionPipeline {
    /// Pipeline using the built-in [`AnsiColorRenderer`] for colorized output.
    pub fn new(settings: ConversionSettings) -> Self {
        Self {
            settings,
            renderer: Box::new(AnsiColorRenderer),
            background: None,
        }
    }

    /// Replace the renderer used when the settings carry no ramp.
    pub fn with_renderer(mut self, renderer: impl FrameRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Run `remover` on every frame before adjustments.
    pub fn with_background_remover(mut self, remover: impl BackgroundRemover + 'static) -> Self {
        self.background = Some(Box::new(remover));
        self
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert every frame, reporting progress after each one.
    ///
    /// `cancel` is checked before each frame, never mid-frame.
    pub fn convert<F>(
        &self,
        frames: Vec<RawFrame>,
        cancel: &CancelToken,
        mut on_progress: F,
    ) -> Result<AsciiAnimation, ConversionError>
    where
        F: FnMut(Progress),
    {
        let total = frames.len();
        if total == 0 {
            return Err(ConversionError::EmptySource);
        }

        log::info!(
            "Converting {} frame(s) at {} columns ({})",
            total,
            self.settings.columns(),
            self.settings.adjustment_summary()
        );

        let mut converted = Vec::with_capacity(total);
        for (index, frame) in frames.into_iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!("Conversion cancelled after {}/{} frames", index, total);
                return Err(ConversionError::Cancelled);
            }

            let ascii = self.convert_frame(index, frame)?;
            converted.push(ascii);

            on_progress(Progress {
                frames_done: index + 1,
                frames_total: total,
            });
        }

        log::info!("Conversion complete: {} frame(s)", converted.len());
        AsciiAnimation::new(converted).ok_or(ConversionError::EmptySource)
    }

    /// Convert a single frame. `index` only labels errors.
    pub fn convert_frame(&self, index: usize, frame: RawFrame) -> Result<AsciiFrame, ConversionError> {
        let frame = self.remove_background(index, frame);
        if frame.width() == 0 || frame.height() == 0 {
            return Err(frame_error(index, "frame has no pixels"));
        }

        let columns = self.settings.columns();
        let delay_ms = frame.effective_delay_ms();

        match self.settings.character_ramp() {
            Some(ramp) => {
                let adjusted = transform::apply(&frame, &self.settings);
                let rows = grid_rows(adjusted.width(), adjusted.height(), columns);
                if rows == 0 {
                    return Err(frame_error(index, "adjusted frame has no pixels"));
                }
                if rows > MAX_GRID_ROWS {
                    return Err(frame_error(
                        index,
                        format!("{} rows exceeds the {} row limit", rows, MAX_GRID_ROWS),
                    ));
                }

                let grid = resize_to_grid(adjusted.image(), columns, rows);
                let gray = to_grayscale(&grid);
                let glyphs = map_to_chars(&gray, ramp);
                let lines = grid_to_lines(&glyphs, columns as usize);

                log::debug!("Frame {}: {}x{} glyphs, {} ms", index, columns, rows, delay_ms);
                Ok(AsciiFrame::from_rows(lines, columns as usize, delay_ms))
            }
            None => {
                // Geometry only: the renderer works from source tones
                let geometry = ConversionSettings::new(columns)
                    .with_aspect_mode(self.settings.aspect_mode());
                let shaped = if geometry.aspect_mode() == AspectMode::Original {
                    frame
                } else {
                    transform::apply(&frame, &geometry)
                };

                let lines = self
                    .renderer
                    .render(shaped.image(), columns)
                    .map_err(|e| frame_error(index, e))?;
                Ok(AsciiFrame::from_rows(lines, columns as usize, delay_ms))
            }
        }
    }

    fn remove_background(&self, index: usize, frame: RawFrame) -> RawFrame {
        let Some(remover) = &self.background else {
            return frame;
        };
        match remover.remove(frame.image()) {
            Ok(image) => frame.with_image(image),
            Err(e) => {
                log::warn!("Background removal failed on frame {}, keeping original: {}", index, e);
                frame
            }
        }
    }
}

fn frame_error(index: usize, reason: impl ToString) -> ConversionError {
    let err = ConversionError::Frame {
        index,
        reason: reason.to_string(),
    };
    log::error!("{}", err);
    err
}
