//! Luminance to glyph mapping.
//!
//! Plain linear bucketing: no dithering, no gamma correction. The exact
//! formula is part of the output format, so converting the same raster
//! always yields the same text.

/// Glyph emitted when the ramp is empty.
const BLANK: char = ' ';

/// Map one luminance sample in `[0, 1]` to a glyph of `ramp`.
///
/// `index = floor(luminance * (len - 1))`, clamped to the ramp. Luminance 0
/// maps to `ramp[0]` (darkest) and 1 maps to the last glyph (lightest).
///
/// # Example
/// ```
/// use glyphreel::ascii::map_luminance;
///
/// let ramp: Vec<char> = "@%#*+=-:. ".chars().collect();
/// assert_eq!(map_luminance(0.0, &ramp), '@');
/// assert_eq!(map_luminance(1.0, &ramp), ' ');
/// ```
#[inline]
pub fn map_luminance(luminance: f32, ramp: &[char]) -> char {
    if ramp.is_empty() {
        return BLANK;
    }
    let last = ramp.len() - 1;
    // NaN casts to 0 and out-of-range values saturate before the clamp
    let idx = (luminance * last as f32).floor();
    let idx = (idx.max(0.0) as usize).min(last);
    ramp[idx]
}

/// Map 8-bit grayscale cells (0-255) to glyphs.
///
/// Each cell is normalized to `g / 255` before bucketing.
pub fn map_to_chars(gray: &[u8], ramp: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(gray.len());
    map_to_chars_into(gray, ramp, &mut out);
    out
}

/// Map grayscale cells to glyphs, reusing an existing buffer.
///
/// Returns the number of glyphs written.
pub fn map_to_chars_into(gray: &[u8], ramp: &[char], buffer: &mut Vec<char>) -> usize {
    buffer.clear();
    buffer.reserve(gray.len());
    buffer.extend(
        gray.iter()
            .map(|&g| map_luminance(g as f32 / 255.0, ramp)),
    );
    gray.len()
}

/// Join a row-major glyph grid into `rows` lines of `columns` glyphs.
pub fn grid_to_lines(glyphs: &[char], columns: usize) -> Vec<String> {
    if columns == 0 {
        return Vec::new();
    }
    glyphs
        .chunks(columns)
        .map(|row| row.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_endpoints() {
        let r = ramp("@%#*+=-:. ");
        assert_eq!(map_luminance(0.0, &r), '@');
        assert_eq!(map_luminance(1.0, &r), ' ');
    }

    #[test]
    fn test_linear_buckets() {
        // 5 glyphs: 4 buckets of width 0.25
        let r = ramp("abcde");
        assert_eq!(map_luminance(0.24, &r), 'a');
        assert_eq!(map_luminance(0.25, &r), 'b');
        assert_eq!(map_luminance(0.5, &r), 'c');
        assert_eq!(map_luminance(0.99, &r), 'd');
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let r = ramp("ab");
        assert_eq!(map_luminance(-3.0, &r), 'a');
        assert_eq!(map_luminance(7.5, &r), 'b');
        assert_eq!(map_luminance(f32::NAN, &r), 'a');
    }

    #[test]
    fn test_empty_ramp() {
        assert_eq!(map_luminance(0.5, &[]), ' ');
    }

    #[test]
    fn test_map_to_chars_gray_extremes() {
        let r = ramp("@%#*+=-:. ");
        assert_eq!(map_to_chars(&[0, 255], &r), vec!['@', ' ']);
    }

    #[test]
    fn test_grid_to_lines() {
        let lines = grid_to_lines(&['a', 'b', 'c', 'd', 'e', 'f'], 3);
        assert_eq!(lines, vec!["abc".to_string(), "def".to_string()]);
        assert!(grid_to_lines(&['a'], 0).is_empty());
    }
}
