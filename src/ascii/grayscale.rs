//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use image::RgbaImage;

/// Luminance of one RGB sample: Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Integer math, coefficients scaled by 1000 (299 + 587 + 114 = 1000).
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Convert an RGBA raster to grayscale, one byte per pixel, row-major.
///
/// Alpha is ignored.
pub fn to_grayscale(image: &RgbaImage) -> Vec<u8> {
    let mut gray = Vec::with_capacity(image.width() as usize * image.height() as usize);
    to_grayscale_into(image, &mut gray);
    gray
}

/// Convert an RGBA raster to grayscale, reusing an existing buffer.
///
/// Returns the number of pixels written.
pub fn to_grayscale_into(image: &RgbaImage, buffer: &mut Vec<u8>) -> usize {
    buffer.clear();
    buffer.reserve(image.width() as usize * image.height() as usize);

    for px in image.pixels() {
        let [r, g, b, _] = px.0;
        buffer.push(luma(r, g, b));
    }

    buffer.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_primaries() {
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 149);
        assert_eq!(luma(0, 0, 255), 29);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
    }

    #[test]
    fn test_to_grayscale_ignores_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 0, Rgba([128, 128, 128, 255]));
        assert_eq!(to_grayscale(&img), vec![255, 128]);
    }

    #[test]
    fn test_into_reuses_buffer() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([0, 255, 0, 255]));
        let mut buf = vec![9; 20];
        assert_eq!(to_grayscale_into(&img, &mut buf), 6);
        assert_eq!(buf, vec![149; 6]);
    }
}
