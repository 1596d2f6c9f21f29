//! Per-frame image adjustments applied before rasterization.
//!
//! Steps run in a fixed order, which is part of the output format:
//!
//! 1. Aspect correction (stretch, never crop)
//! 2. Brightness
//! 3. Contrast
//! 4. Invert
//!
//! Every step fails soft. If a step cannot run, the frame passes through
//! unchanged and a warning is logged; the remaining steps still run.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::frame::RawFrame;
use crate::settings::{ConversionSettings, NEUTRAL_CONTRAST};

/// Ratio difference below which aspect correction is skipped.
pub const ASPECT_TOLERANCE: f64 = 0.1;

/// Largest width or height aspect correction will produce.
pub const MAX_RASTER_DIMENSION: u32 = 16_384;

/// Mid-gray pivot for the contrast transform.
const MID_GRAY: f32 = 128.0;

/// Filter used for aspect correction.
const ASPECT_FILTER: FilterType = FilterType::Lanczos3;

/// Reasons a single adjustment step is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// The raster has no pixels
    #[error("raster is empty ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
    /// Stretching would exceed the maximum raster size
    #[error("stretched raster {width}x{height} exceeds the {max} pixel limit")]
    TooLarge { width: u64, height: u64, max: u32 },
}

/// Apply every adjustment in `settings` to `frame`.
///
/// The returned frame keeps the source delay. Steps that do not apply
/// (neutral brightness, contrast at 100%, `Original` aspect) are skipped.
pub fn apply(frame: &RawFrame, settings: &ConversionSettings) -> RawFrame {
    let mut image = frame.image().clone();

    if let Some(target) = settings.aspect_mode().ratio() {
        image = fail_soft("aspect", image, |img| correct_aspect(img, target));
    }

    if settings.brightness() != 0 {
        let brightness = settings.brightness();
        image = fail_soft("brightness", image, |img| adjust_brightness(img, brightness));
    }

    if settings.contrast() != NEUTRAL_CONTRAST {
        let contrast = settings.contrast();
        image = fail_soft("contrast", image, |img| adjust_contrast(img, contrast));
    }

    if settings.invert() {
        image = fail_soft("invert", image, invert_colors);
    }

    frame.with_image(image)
}

/// Run one step, keeping the input if the step fails.
fn fail_soft<F>(step: &str, image: RgbaImage, f: F) -> RgbaImage
where
    F: FnOnce(&RgbaImage) -> Result<Option<RgbaImage>, TransformError>,
{
    match f(&image) {
        Ok(Some(out)) => out,
        Ok(None) => image,
        Err(e) => {
            log::warn!("Skipping {} adjustment: {}", step, e);
            image
        }
    }
}

fn ensure_not_empty(image: &RgbaImage) -> Result<(), TransformError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(TransformError::EmptyRaster {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// Stretch the shorter side so `width / height` approaches `target`.
///
/// Returns `Ok(None)` when the ratio is already within tolerance.
pub fn correct_aspect(image: &RgbaImage, target: f64) -> Result<Option<RgbaImage>, TransformError> {
    ensure_not_empty(image)?;

    let (width, height) = image.dimensions();
    let current = width as f64 / height as f64;
    if (current - target).abs() <= ASPECT_TOLERANCE {
        return Ok(None);
    }

    let (new_width, new_height) = if target > current {
        ((height as f64 * target).floor() as u64, height as u64)
    } else {
        (width as u64, (width as f64 / target).floor() as u64)
    };

    if new_width == 0 || new_height == 0 {
        return Err(TransformError::EmptyRaster {
            width: new_width as u32,
            height: new_height as u32,
        });
    }
    if new_width > MAX_RASTER_DIMENSION as u64 || new_height > MAX_RASTER_DIMENSION as u64 {
        return Err(TransformError::TooLarge {
            width: new_width,
            height: new_height,
            max: MAX_RASTER_DIMENSION,
        });
    }

    log::debug!(
        "Aspect correction {}x{} -> {}x{} (target {:.3})",
        width,
        height,
        new_width,
        new_height,
        target
    );
    Ok(Some(imageops::resize(
        image,
        new_width as u32,
        new_height as u32,
        ASPECT_FILTER,
    )))
}

/// Scale every color channel by `clamp(1 + brightness/100, 0, 2)`.
pub fn adjust_brightness(
    image: &RgbaImage,
    brightness: i32,
) -> Result<Option<RgbaImage>, TransformError> {
    if brightness == 0 {
        return Ok(None);
    }
    ensure_not_empty(image)?;

    let factor = (1.0 + brightness as f32 / 100.0).clamp(0.0, 2.0);
    Ok(Some(map_rgb(image, |c| c * factor)))
}

/// Stretch channel values away from (or toward) mid-gray by
/// `clamp(contrast/100, 0.25, 2.0)`.
pub fn adjust_contrast(
    image: &RgbaImage,
    contrast: i32,
) -> Result<Option<RgbaImage>, TransformError> {
    if contrast == NEUTRAL_CONTRAST {
        return Ok(None);
    }
    ensure_not_empty(image)?;

    let factor = (contrast as f32 / 100.0).clamp(0.25, 2.0);
    Ok(Some(map_rgb(image, |c| MID_GRAY + factor * (c - MID_GRAY))))
}

/// Negate color channels; alpha is left untouched.
pub fn invert_colors(image: &RgbaImage) -> Result<Option<RgbaImage>, TransformError> {
    ensure_not_empty(image)?;
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px.0[0] = 255 - px.0[0];
        px.0[1] = 255 - px.0[1];
        px.0[2] = 255 - px.0[2];
    }
    Ok(Some(out))
}

/// Apply `f` to each RGB channel, rounding and clamping to 0-255.
fn map_rgb<F>(image: &RgbaImage, f: F) -> RgbaImage
where
    F: Fn(f32) -> f32,
{
    let mut out = image.clone();
    for px in out.pixels_mut() {
        for c in &mut px.0[..3] {
            *c = f(*c as f32).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AspectMode;
    use image::Rgba;

    fn gray(width: u32, height: u32, v: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([v, v, v, 255]))
    }

    #[test]
    fn test_brightness_minus_100_is_black() {
        let out = adjust_brightness(&gray(4, 4, 200), -100).unwrap().unwrap();
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_brightness_doubles_and_clamps() {
        let out = adjust_brightness(&gray(1, 1, 100), 100).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [200, 200, 200, 255]);
        let out = adjust_brightness(&gray(1, 1, 200), 100).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_brightness_zero_is_noop() {
        assert!(adjust_brightness(&gray(1, 1, 100), 0).unwrap().is_none());
    }

    #[test]
    fn test_contrast_pivots_on_mid_gray() {
        let mut img = gray(2, 1, 64);
        img.put_pixel(1, 0, Rgba([128, 128, 128, 255]));
        let out = adjust_contrast(&img, 200).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(1, 0).0, [128, 128, 128, 255]);

        let out = adjust_contrast(&gray(1, 1, 0), 50).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [64, 64, 64, 255]);
    }

    #[test]
    fn test_contrast_pivot_ignores_frame_mean() {
        // A uniform frame still moves away from 128, not from its own mean
        let out = adjust_contrast(&gray(3, 3, 200), 200).unwrap().unwrap();
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_contrast_neutral_is_noop() {
        assert!(adjust_contrast(&gray(1, 1, 10), 100).unwrap().is_none());
    }

    #[test]
    fn test_invert_preserves_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 77]));
        let out = invert_colors(&img).unwrap().unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [245, 235, 225, 77]);
    }

    #[test]
    fn test_aspect_stretches_width_for_wider_target() {
        let out = correct_aspect(&gray(100, 100, 50), 16.0 / 9.0).unwrap().unwrap();
        assert_eq!(out.dimensions(), (177, 100));
    }

    #[test]
    fn test_aspect_stretches_height_for_taller_target() {
        let out = correct_aspect(&gray(100, 100, 50), 9.0 / 16.0).unwrap().unwrap();
        assert_eq!(out.dimensions(), (100, 177));
    }

    #[test]
    fn test_aspect_within_tolerance_is_noop() {
        assert!(correct_aspect(&gray(105, 100, 50), 1.0).unwrap().is_none());
    }

    #[test]
    fn test_aspect_rejects_oversized_target() {
        let err = correct_aspect(&gray(10_000, 10, 50), 1.0 / 1000.0).unwrap_err();
        assert!(matches!(err, TransformError::TooLarge { .. }));
    }

    #[test]
    fn test_failed_step_passes_frame_through() {
        let frame = RawFrame::solid(10_000, 10, [50, 50, 50], Some(30));
        let settings = ConversionSettings::default()
            .with_aspect_mode(AspectMode::Custom(0.001))
            .with_invert(true);
        let out = apply(&frame, &settings);
        // Aspect step skipped, invert still applied
        assert_eq!(out.width(), 10_000);
        assert_eq!(out.height(), 10);
        assert_eq!(out.image().get_pixel(0, 0).0, [205, 205, 205, 255]);
        assert_eq!(out.delay_ms(), Some(30));
    }

    #[test]
    fn test_empty_raster_passes_through() {
        let frame = RawFrame::new(RgbaImage::new(0, 0), None);
        let settings = ConversionSettings::default()
            .with_brightness(50)
            .with_invert(true);
        let out = apply(&frame, &settings);
        assert_eq!(out.width(), 0);
    }

    #[test]
    fn test_order_brightness_before_invert() {
        // brightness -100 then invert gives white; the other order would give black
        let frame = RawFrame::solid(2, 2, [90, 90, 90], None);
        let settings = ConversionSettings::default()
            .with_brightness(-100)
            .with_invert(true);
        let out = apply(&frame, &settings);
        assert!(out.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }
}
