//! Conversion error types.

/// Errors (and the cancelled outcome) of a conversion run.
///
/// Any failure discards every frame converted so far.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The source sequence was empty
    #[error("Nothing to convert: the source has no frames")]
    EmptySource,
    /// One frame could not be converted
    #[error("Frame {index} could not be converted: {reason}")]
    Frame { index: usize, reason: String },
    /// Cancellation was observed between frames
    #[error("Conversion cancelled")]
    Cancelled,
    /// The background worker could not be started
    #[error("Failed to start conversion worker: {0}")]
    Spawn(std::io::Error),
    /// The background worker exited without reporting a result
    #[error("Conversion worker stopped without a result")]
    WorkerLost,
}

impl ConversionError {
    /// True for the cancelled outcome, which is not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConversionError::Cancelled)
    }

    /// Index of the failing frame, if a single frame failed.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            ConversionError::Frame { index, .. } => Some(*index),
            _ => None,
        }
    }
}
