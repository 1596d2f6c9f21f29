//! CLI enum types for character set and aspect options.

use clap::ValueEnum;

use crate::ascii;

/// Character set preset for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Detailed,
    Simple,
    Blocks,
    Binary,
    Dots,
    Minimal,
    /// Glyphs from --chars
    Custom,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Detailed => ascii::CharSet::Detailed,
            CharacterSet::Simple => ascii::CharSet::Simple,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Binary => ascii::CharSet::Binary,
            CharacterSet::Dots => ascii::CharSet::Dots,
            CharacterSet::Minimal => ascii::CharSet::Minimal,
            CharacterSet::Custom => ascii::CharSet::Custom,
        }
    }
}

/// Aspect ratio applied before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Aspect {
    #[default]
    Original,
    /// 1:1
    Square,
    /// 16:9
    Widescreen,
    /// 9:16
    Portrait,
    /// Ratio from --ratio
    Custom,
}

impl Aspect {
    /// Name understood by the config file.
    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Original => "original",
            Aspect::Square => "square",
            Aspect::Widescreen => "widescreen",
            Aspect::Portrait => "portrait",
            Aspect::Custom => "custom",
        }
    }
}
