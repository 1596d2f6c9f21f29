//! Character ramp presets and validation.
//!
//! Every ramp is ordered from darkest (lowest luminance) to lightest.

/// Simple density ramp (10 levels). Also the fallback for invalid ramps.
pub const SIMPLE_RAMP: &str = "@%#*+=-:. ";

/// Unicode block elements (5 levels).
pub const BLOCKS_RAMP: &str = "█▓▒░ ";

/// Binary digits only.
pub const BINARY_RAMP: &str = "10 ";

/// Circular dots.
pub const DOTS_RAMP: &str = "●◐○ ";

/// Two glyphs plus blank.
pub const MINIMAL_RAMP: &str = "█░ ";

/// Character set preset used to pick a ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Full detail ramp
    #[default]
    Detailed,
    /// Plain ASCII ramp
    Simple,
    /// Unicode block elements
    Blocks,
    /// 1, 0 and blank
    Binary,
    /// Circular dots
    Dots,
    /// Two glyphs plus blank
    Minimal,
    /// User supplied glyphs
    Custom,
}

impl CharSet {
    pub const ALL: [CharSet; 7] = [
        CharSet::Detailed,
        CharSet::Simple,
        CharSet::Blocks,
        CharSet::Binary,
        CharSet::Dots,
        CharSet::Minimal,
        CharSet::Custom,
    ];

    /// Ramp for this preset. `Custom` returns the simple ramp; use
    /// [`CharSet::resolve`] to apply custom glyphs. `Detailed` returns the
    /// simple ramp too, for previews; conversion colorizes it instead.
    pub fn ramp(&self) -> &'static str {
        match self {
            CharSet::Detailed | CharSet::Simple | CharSet::Custom => SIMPLE_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
            CharSet::Binary => BINARY_RAMP,
            CharSet::Dots => DOTS_RAMP,
            CharSet::Minimal => MINIMAL_RAMP,
        }
    }

    /// True for the preset drawn by the colorized renderer rather than a ramp.
    pub fn is_colorized(&self) -> bool {
        matches!(self, CharSet::Detailed)
    }

    /// Ramp for this preset, using `custom` when the preset is `Custom`.
    ///
    /// Invalid custom glyphs fall back to the simple ramp.
    pub fn resolve(&self, custom: Option<&str>) -> Vec<char> {
        match (self, custom) {
            (CharSet::Custom, Some(chars)) => sanitize_ramp(chars),
            (CharSet::Custom, None) => {
                log::warn!("Custom charset selected without glyphs, using simple ramp");
                SIMPLE_RAMP.chars().collect()
            }
            _ => self.ramp().chars().collect(),
        }
    }

    /// Short lowercase name, as used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Detailed => "detailed",
            CharSet::Simple => "simple",
            CharSet::Blocks => "blocks",
            CharSet::Binary => "binary",
            CharSet::Dots => "dots",
            CharSet::Minimal => "minimal",
            CharSet::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CharSet::Detailed => "Detailed (Default)",
            CharSet::Simple => "Simple",
            CharSet::Blocks => "Blocks (Unicode)",
            CharSet::Binary => "Binary (0/1)",
            CharSet::Dots => "Dots",
            CharSet::Minimal => "Minimal",
            CharSet::Custom => "Custom...",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CharSet::Detailed => "Full color rendering with 24-bit ANSI escapes - @%#*+=-:. ",
            CharSet::Simple => "Simple ASCII characters - @%#*+=-:. ",
            CharSet::Blocks => "Unicode block elements - █▓▒░",
            CharSet::Binary => "Binary digits only - 1 and 0",
            CharSet::Dots => "Circular dots - ●◐○",
            CharSet::Minimal => "Two characters only - █░",
            CharSet::Custom => "Define your own character set",
        }
    }

    /// Parse a preset name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        CharSet::ALL.into_iter().find(|c| c.name() == s)
    }

    /// Gradient preview: each glyph repeated three times.
    pub fn preview(&self, custom: Option<&str>) -> String {
        self.resolve(custom)
            .into_iter()
            .flat_map(|c| std::iter::repeat(c).take(3))
            .collect()
    }
}

/// Check that a ramp has at least two glyphs and no duplicates.
pub fn validate_ramp(chars: &str) -> bool {
    let glyphs: Vec<char> = chars.chars().collect();
    if glyphs.len() < 2 {
        return false;
    }
    let mut seen = std::collections::HashSet::with_capacity(glyphs.len());
    glyphs.iter().all(|c| seen.insert(*c))
}

/// Return the glyphs of `chars`, or the simple ramp if they are not a valid ramp.
pub fn sanitize_ramp(chars: &str) -> Vec<char> {
    if validate_ramp(chars) {
        chars.chars().collect()
    } else {
        log::warn!(
            "Invalid character ramp {:?} (need at least 2 distinct glyphs), using {:?}",
            chars,
            SIMPLE_RAMP
        );
        SIMPLE_RAMP.chars().collect()
    }
}
