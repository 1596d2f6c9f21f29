//! ASCII rasterization primitives.
//!
//! The building blocks the conversion pipeline strings together:
//!
//! 1. **Grid sizing** - rows from columns and the glyph-cell correction
//! 2. **Downsampling** - resample the raster to one pixel per cell
//! 3. **Grayscale conversion** - RGB to luminance using BT.601
//! 4. **Glyph mapping** - luminance to a glyph of the character ramp
//!
//! # Character Sets
//!
//! Presets are available via [`CharSet`]; every ramp runs from darkest
//! to lightest glyph.

mod charset;
mod dimensions;
mod downsample;
mod grayscale;
mod mapping;

pub use charset::{
    sanitize_ramp, validate_ramp, CharSet, BINARY_RAMP, BLOCKS_RAMP, DOTS_RAMP, MINIMAL_RAMP,
    SIMPLE_RAMP,
};
pub use dimensions::{grid_rows, CELL_ASPECT_CORRECTION, MAX_GRID_ROWS};
pub use downsample::{cell_colors, resize_to_grid, CellColor, GRID_FILTER};
pub use grayscale::{luma, to_grayscale, to_grayscale_into};
pub use mapping::{grid_to_lines, map_luminance, map_to_chars, map_to_chars_into};
