//! Resampling rasters down (or up) to the character grid.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Filter used to shrink a raster to one pixel per glyph cell.
pub const GRID_FILTER: FilterType = FilterType::Triangle;

/// RGB color of one downsampled cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Resize a raster to exactly `columns` x `rows` pixels, one per glyph cell.
///
/// Returns an empty image if any dimension is zero.
pub fn resize_to_grid(image: &RgbaImage, columns: u32, rows: u32) -> RgbaImage {
    if columns == 0 || rows == 0 || image.width() == 0 || image.height() == 0 {
        return RgbaImage::new(0, 0);
    }
    if image.width() == columns && image.height() == rows {
        return image.clone();
    }
    imageops::resize(image, columns, rows, GRID_FILTER)
}

/// Cell colors of a grid-sized raster, row-major.
pub fn cell_colors(grid: &RgbaImage) -> Vec<CellColor> {
    grid.pixels()
        .map(|px| CellColor {
            r: px.0[0],
            g: px.0[1],
            b: px.0[2],
        })
        .collect()
}
