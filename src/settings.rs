//! Validated conversion settings.
//!
//! Every value is clamped (or replaced by a default) when it is set, so the
//! pipeline never sees an out-of-range setting.

use std::fmt;

use crate::ascii::{sanitize_ramp, SIMPLE_RAMP};

pub const MIN_COLUMNS: u32 = 1;
pub const MAX_COLUMNS: u32 = 1000;
pub const DEFAULT_COLUMNS: u32 = 120;

pub const MIN_BRIGHTNESS: i32 = -100;
pub const MAX_BRIGHTNESS: i32 = 100;

pub const MIN_CONTRAST: i32 = 25;
pub const MAX_CONTRAST: i32 = 200;
pub const NEUTRAL_CONTRAST: i32 = 100;

/// Target aspect ratio applied before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AspectMode {
    /// Keep the source aspect ratio
    #[default]
    Original,
    /// 1:1
    Square,
    /// 16:9
    Widescreen,
    /// 9:16
    Portrait,
    /// Arbitrary width/height ratio
    Custom(f64),
}

impl AspectMode {
    /// Target width/height ratio, `None` for `Original`.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            AspectMode::Original => None,
            AspectMode::Square => Some(1.0),
            AspectMode::Widescreen => Some(16.0 / 9.0),
            AspectMode::Portrait => Some(9.0 / 16.0),
            AspectMode::Custom(r) => Some(*r),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AspectMode::Original => "original",
            AspectMode::Square => "square",
            AspectMode::Widescreen => "widescreen",
            AspectMode::Portrait => "portrait",
            AspectMode::Custom(_) => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AspectMode::Original => "Keep Original",
            AspectMode::Square => "Square (1:1)",
            AspectMode::Widescreen => "Widescreen (16:9)",
            AspectMode::Portrait => "Portrait (9:16)",
            AspectMode::Custom(_) => "Custom...",
        }
    }

    /// Parse a mode name. `custom` takes its ratio from `ratio` (1.0 if absent).
    pub fn from_name(name: &str, ratio: Option<f64>) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "original" => Some(AspectMode::Original),
            "square" => Some(AspectMode::Square),
            "widescreen" | "16:9" => Some(AspectMode::Widescreen),
            "portrait" | "9:16" => Some(AspectMode::Portrait),
            "custom" => Some(AspectMode::Custom(ratio.unwrap_or(1.0))),
            _ => None,
        }
    }

    /// A custom ratio that is not finite and positive becomes `Original`.
    fn sanitized(self) -> Self {
        match self {
            AspectMode::Custom(r) if !(r.is_finite() && r > 0.0) => {
                log::warn!("Ignoring invalid custom aspect ratio {}, keeping original", r);
                AspectMode::Original
            }
            other => other,
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectMode::Custom(r) => write!(f, "custom ({:.3})", r),
            other => f.write_str(other.name()),
        }
    }
}

/// Settings for one conversion run.
///
/// Built with [`ConversionSettings::new`] and the `with_*` methods, each of
/// which clamps its input into range.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSettings {
    columns: u32,
    character_ramp: Option<Vec<char>>,
    brightness: i32,
    contrast: i32,
    invert: bool,
    aspect_mode: AspectMode,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            character_ramp: Some(SIMPLE_RAMP.chars().collect()),
            brightness: 0,
            contrast: NEUTRAL_CONTRAST,
            invert: false,
            aspect_mode: AspectMode::Original,
        }
    }
}

impl ConversionSettings {
    /// Default settings at the given width (clamped to 1..=1000 columns).
    pub fn new(columns: u32) -> Self {
        Self::default().with_columns(columns)
    }

    pub fn with_columns(mut self, columns: u32) -> Self {
        self.columns = clamped("columns", columns, MIN_COLUMNS, MAX_COLUMNS);
        self
    }

    /// Use a custom ramp, darkest glyph first.
    ///
    /// A ramp with fewer than 2 distinct glyphs falls back to the simple ramp.
    pub fn with_ramp(mut self, ramp: &str) -> Self {
        self.character_ramp = Some(sanitize_ramp(ramp));
        self
    }

    /// Hand rasterization to the default colorized renderer instead of a ramp.
    pub fn colorized(mut self) -> Self {
        self.character_ramp = None;
        self
    }

    pub fn with_brightness(mut self, brightness: i32) -> Self {
        self.brightness = clamped("brightness", brightness, MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        self
    }

    pub fn with_contrast(mut self, contrast: i32) -> Self {
        self.contrast = clamped("contrast", contrast, MIN_CONTRAST, MAX_CONTRAST);
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_aspect_mode(mut self, mode: AspectMode) -> Self {
        self.aspect_mode = mode.sanitized();
        self
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// The custom ramp, or `None` when the colorized renderer is requested.
    pub fn character_ramp(&self) -> Option<&[char]> {
        self.character_ramp.as_deref()
    }

    pub fn is_colorized(&self) -> bool {
        self.character_ramp.is_none()
    }

    pub fn brightness(&self) -> i32 {
        self.brightness
    }

    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn aspect_mode(&self) -> AspectMode {
        self.aspect_mode
    }

    /// Human readable list of active adjustments.
    pub fn adjustment_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.brightness != 0 {
            let sign = if self.brightness > 0 { "+" } else { "" };
            parts.push(format!("Bright: {}{}", sign, self.brightness));
        }
        if self.contrast != NEUTRAL_CONTRAST {
            parts.push(format!("Contrast: {}%", self.contrast));
        }
        if self.invert {
            parts.push("Inverted".to_string());
        }
        if parts.is_empty() {
            "No adjustments".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

fn clamped<T: Ord + Copy + fmt::Display>(name: &str, value: T, min: T, max: T) -> T {
    let out = value.clamp(min, max);
    if out != value {
        log::warn!("{} {} out of range, using {}", name, value, out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ConversionSettings::default();
        assert_eq!(s.columns(), 120);
        assert_eq!(s.brightness(), 0);
        assert_eq!(s.contrast(), 100);
        assert!(!s.invert());
        assert_eq!(s.aspect_mode(), AspectMode::Original);
        assert_eq!(s.character_ramp().unwrap().len(), 10);
        assert!(!s.is_colorized());
    }

    #[test]
    fn test_values_are_clamped() {
        let s = ConversionSettings::new(0)
            .with_brightness(-500)
            .with_contrast(10);
        assert_eq!(s.columns(), 1);
        assert_eq!(s.brightness(), -100);
        assert_eq!(s.contrast(), 25);

        let s = ConversionSettings::new(5000)
            .with_brightness(101)
            .with_contrast(900);
        assert_eq!(s.columns(), 1000);
        assert_eq!(s.brightness(), 100);
        assert_eq!(s.contrast(), 200);
    }

    #[test]
    fn test_invalid_ramp_falls_back() {
        let s = ConversionSettings::default().with_ramp("xxx");
        assert_eq!(s.character_ramp().unwrap(), SIMPLE_RAMP.chars().collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_colorized_drops_ramp() {
        let s = ConversionSettings::default().colorized();
        assert!(s.is_colorized());
        assert!(s.character_ramp().is_none());
        assert!(!s.with_ramp("ab").is_colorized());
    }

    #[test]
    fn test_invalid_custom_aspect_becomes_original() {
        let s = ConversionSettings::default().with_aspect_mode(AspectMode::Custom(-2.0));
        assert_eq!(s.aspect_mode(), AspectMode::Original);
        let s = ConversionSettings::default().with_aspect_mode(AspectMode::Custom(f64::NAN));
        assert_eq!(s.aspect_mode(), AspectMode::Original);
        let s = ConversionSettings::default().with_aspect_mode(AspectMode::Custom(2.0));
        assert_eq!(s.aspect_mode(), AspectMode::Custom(2.0));
    }

    #[test]
    fn test_aspect_ratios() {
        assert_eq!(AspectMode::Original.ratio(), None);
        assert_eq!(AspectMode::Square.ratio(), Some(1.0));
        assert_eq!(AspectMode::Widescreen.ratio(), Some(16.0 / 9.0));
        assert_eq!(AspectMode::Portrait.ratio(), Some(9.0 / 16.0));
    }

    #[test]
    fn test_aspect_from_name() {
        assert_eq!(AspectMode::from_name("Widescreen", None), Some(AspectMode::Widescreen));
        assert_eq!(AspectMode::from_name("9:16", None), Some(AspectMode::Portrait));
        assert_eq!(AspectMode::from_name("custom", Some(2.5)), Some(AspectMode::Custom(2.5)));
        assert_eq!(AspectMode::from_name("custom", None), Some(AspectMode::Custom(1.0)));
        assert_eq!(AspectMode::from_name("cinema", None), None);
    }

    #[test]
    fn test_adjustment_summary() {
        assert_eq!(ConversionSettings::default().adjustment_summary(), "No adjustments");
        let s = ConversionSettings::default()
            .with_brightness(20)
            .with_contrast(150)
            .with_invert(true);
        assert_eq!(s.adjustment_summary(), "Bright: +20 | Contrast: 150% | Inverted");
        let s = ConversionSettings::default().with_brightness(-5);
        assert_eq!(s.adjustment_summary(), "Bright: -5");
    }
}
