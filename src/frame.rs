//! Frame types shared by the conversion pipeline and the playback scheduler.

use std::fmt;

use image::RgbaImage;

/// Delay used when a source frame declares none (or declares zero).
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Errors raised while turning source bytes into frames.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Failed to read the source file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The image library rejected the data
    #[error("Failed to decode '{path}': {source}")]
    Image {
        path: String,
        source: image::ImageError,
    },
    /// Raw sample buffer does not match the declared dimensions
    #[error("Frame buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// The source decoded to zero frames
    #[error("'{path}' contains no frames")]
    NoFrames { path: String },
}

/// A decoded source frame: RGBA samples plus the source-declared delay.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    image: RgbaImage,
    delay_ms: Option<u32>,
}

impl RawFrame {
    /// Wrap an already decoded RGBA image.
    pub fn new(image: RgbaImage, delay_ms: Option<u32>) -> Self {
        Self { image, delay_ms }
    }

    /// Build a frame from packed RGB samples (3 bytes per pixel).
    pub fn from_rgb(
        width: u32,
        height: u32,
        data: &[u8],
        delay_ms: Option<u32>,
    ) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(DecodeError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        let mut rgba = Vec::with_capacity(expected / 3 * 4);
        for rgb in data.chunks_exact(3) {
            rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self::from_rgba(width, height, rgba, delay_ms)
    }

    /// Build a frame from packed RGBA samples (4 bytes per pixel).
    pub fn from_rgba(
        width: u32,
        height: u32,
        data: Vec<u8>,
        delay_ms: Option<u32>,
    ) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let size_error = DecodeError::BufferSize {
            width,
            height,
            expected,
            actual,
        };
        // from_raw accepts oversized buffers, so check the exact length first
        if actual != expected {
            return Err(size_error);
        }
        let image = RgbaImage::from_raw(width, height, data).ok_or(size_error)?;
        Ok(Self { image, delay_ms })
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], delay_ms: Option<u32>) -> Self {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
        Self { image, delay_ms }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Delay as declared by the source, if any.
    pub fn delay_ms(&self) -> Option<u32> {
        self.delay_ms
    }

    /// Delay to carry into the converted frame. Absent or zero becomes 100 ms.
    pub fn effective_delay_ms(&self) -> u32 {
        match self.delay_ms {
            Some(0) | None => DEFAULT_FRAME_DELAY_MS,
            Some(ms) => ms,
        }
    }

    /// Same delay, new pixels.
    pub(crate) fn with_image(&self, image: RgbaImage) -> Self {
        Self {
            image,
            delay_ms: self.delay_ms,
        }
    }
}

/// One rendered character grid plus its display duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsciiFrame {
    text: String,
    columns: usize,
    rows: usize,
    delay_ms: u32,
}

impl AsciiFrame {
    /// Build a frame from its rows. A zero delay is raised to 1 ms.
    pub fn from_rows<I, S>(rows: I, columns: usize, delay_ms: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        let mut count = 0;
        for row in rows {
            if count > 0 {
                text.push('\n');
            }
            text.push_str(row.as_ref());
            count += 1;
        }
        Self {
            text,
            columns,
            rows: count,
            delay_ms: delay_ms.max(1),
        }
    }

    /// Full frame text, rows separated by `'\n'`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }

    /// Glyph columns per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An ordered, non-empty run of converted frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsciiAnimation {
    frames: Vec<AsciiFrame>,
}

impl AsciiAnimation {
    /// Returns `None` for an empty frame list.
    pub fn new(frames: Vec<AsciiFrame>) -> Option<Self> {
        if frames.is_empty() {
            None
        } else {
            Some(Self { frames })
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&AsciiFrame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[AsciiFrame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AsciiFrame> {
        self.frames.iter()
    }

    /// Whether this is a multi-frame animation rather than a still.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Sum of all frame delays at normal speed.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.delay_ms as u64).sum()
    }
}

impl<'a> IntoIterator for &'a AsciiAnimation {
    type Item = &'a AsciiFrame;
    type IntoIter = std::slice::Iter<'a, AsciiFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
