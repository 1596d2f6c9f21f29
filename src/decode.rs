//! Source decoding: still images and animated GIFs into [`RawFrame`]s.

use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageFormat};

use crate::frame::{DecodeError, RawFrame};

/// Decode a file from disk.
pub fn decode_file(path: &Path) -> Result<Vec<RawFrame>, DecodeError> {
    let label = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: label.clone(),
        source,
    })?;
    decode_bytes(&bytes, &label)
}

/// Decode an in-memory image. `label` names the source in errors.
///
/// GIFs yield one frame per animation frame with their declared delay
/// (a zero delay becomes `None`). Every other format yields a single
/// frame without a delay.
pub fn decode_bytes(bytes: &[u8], label: &str) -> Result<Vec<RawFrame>, DecodeError> {
    let image_error = |source: image::ImageError| DecodeError::Image {
        path: label.to_string(),
        source,
    };

    let format = image::guess_format(bytes).map_err(image_error)?;
    let frames = match format {
        ImageFormat::Gif => decode_gif(bytes).map_err(image_error)?,
        other => {
            let image = image::load_from_memory_with_format(bytes, other).map_err(image_error)?;
            vec![RawFrame::new(image.to_rgba8(), None)]
        }
    };

    if frames.is_empty() {
        return Err(DecodeError::NoFrames {
            path: label.to_string(),
        });
    }

    log::debug!(
        "Decoded {}: {:?}, {} frame(s), {}x{}",
        label,
        format,
        frames.len(),
        frames[0].width(),
        frames[0].height()
    );
    Ok(frames)
}

fn decode_gif(bytes: &[u8]) -> image::ImageResult<Vec<RawFrame>> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay_ms = if denom > 0 { numer / denom } else { 0 };
        let delay_ms = (delay_ms > 0).then_some(delay_ms);
        frames.push(RawFrame::new(frame.into_buffer(), delay_ms));
    }
    Ok(frames)
}
