//! Pluggable collaborators of the conversion pipeline.
//!
//! [`FrameRenderer`] rasterizes a whole frame when no custom ramp is
//! requested. [`BackgroundRemover`] may replace a frame's pixels before
//! any adjustment runs.

use std::fmt::Write as _;

use image::RgbaImage;

use crate::ascii::{
    cell_colors, grid_rows, luma, map_luminance, resize_to_grid, CellColor, MAX_GRID_ROWS,
};

/// Boxed error returned by collaborators.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Sparse to dense glyphs, so brighter cells draw heavier glyphs in color.
pub const COLOR_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const RESET: &str = "\x1b[0m";

/// Rasterizes a full frame into text rows.
pub trait FrameRenderer: Send + Sync {
    /// Render `image` into rows of `columns` glyphs.
    fn render(&self, image: &RgbaImage, columns: u32) -> Result<Vec<String>, CollaboratorError>;
}

/// Opaque image-to-image transform run before adjustments.
pub trait BackgroundRemover: Send + Sync {
    fn remove(&self, image: &RgbaImage) -> Result<RgbaImage, CollaboratorError>;
}

/// Default colorized renderer.
///
/// Picks a glyph per cell from its luminance and colors it with the cell's
/// source RGB using 24-bit foreground escapes. Each row ends with a reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiColorRenderer;

impl FrameRenderer for AnsiColorRenderer {
    fn render(&self, image: &RgbaImage, columns: u32) -> Result<Vec<String>, CollaboratorError> {
        let rows = grid_rows(image.width(), image.height(), columns);
        if rows == 0 {
            return Err(format!(
                "cannot render a {}x{} raster at {} columns",
                image.width(),
                image.height(),
                columns
            )
            .into());
        }
        if rows > MAX_GRID_ROWS {
            return Err(format!("{} rows exceeds the {} row limit", rows, MAX_GRID_ROWS).into());
        }

        let grid = resize_to_grid(image, columns, rows);
        let colors = cell_colors(&grid);

        Ok(colors
            .chunks(columns as usize)
            .map(render_row)
            .collect())
    }
}

fn render_row(cells: &[CellColor]) -> String {
    let mut line = String::with_capacity(cells.len() * 4);
    let mut current: Option<CellColor> = None;

    for cell in cells {
        if current != Some(*cell) {
            // Writing to a String cannot fail
            let _ = write!(line, "\x1b[38;2;{};{};{}m", cell.r, cell.g, cell.b);
            current = Some(*cell);
        }
        let lum = luma(cell.r, cell.g, cell.b) as f32 / 255.0;
        line.push(map_luminance(lum, COLOR_RAMP));
    }

    line.push_str(RESET);
    line
}

/// Remove ANSI escape sequences, leaving only glyphs.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Parameters and intermediates run until a final byte in @..~
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
