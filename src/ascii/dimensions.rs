//! Grid dimension calculation for aspect-ratio-correct ASCII output.

/// Height-to-width correction for a monospaced glyph cell.
///
/// Cells are taller than wide, so a raster of aspect `h/w` needs
/// `columns * (h/w) * 0.55` rows to look right.
pub const CELL_ASPECT_CORRECTION: f64 = 0.55;

/// Largest grid height the pipeline will rasterize.
pub const MAX_GRID_ROWS: u32 = 16_384;

/// Number of rows for a raster rendered `columns` glyphs wide.
///
/// `rows = round(columns * (height / width) * 0.55)`, at least 1.
/// Returns 0 for a degenerate raster or zero columns.
///
/// # Example
/// ```
/// use glyphreel::ascii::grid_rows;
///
/// assert_eq!(grid_rows(120, 120, 120), 66);
/// ```
pub fn grid_rows(img_width: u32, img_height: u32, columns: u32) -> u32 {
    if img_width == 0 || img_height == 0 || columns == 0 {
        return 0;
    }
    let aspect = img_height as f64 / img_width as f64;
    let rows = (columns as f64 * aspect * CELL_ASPECT_CORRECTION).round();
    (rows as u32).max(1)
}
