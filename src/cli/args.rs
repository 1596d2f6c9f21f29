//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Aspect, CharacterSet};
use crate::ascii::CharSet;
use crate::config::Config;

/// Convert images and GIFs to character art and play them in the terminal
#[derive(Parser, Debug)]
#[command(name = "glyphreel")]
#[command(version, about = "Character art converter and terminal player", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image or GIF and print the result
    Convert {
        /// Source image or GIF
        file: PathBuf,

        #[command(flatten)]
        conversion: ConversionArgs,

        /// Print only the frame at this index
        #[arg(long)]
        frame: Option<usize>,
    },
    /// Play an image or GIF in the terminal (Ctrl+C to quit)
    Play {
        /// Source image or GIF
        file: PathBuf,

        #[command(flatten)]
        conversion: ConversionArgs,

        /// Playback speed multiplier (0.1 - 5.0)
        #[arg(long)]
        speed: Option<f32>,

        /// Play once instead of looping
        #[arg(long)]
        no_loop: bool,

        /// Hide status line
        #[arg(long)]
        no_status: bool,
    },
    /// List character set presets
    Charsets,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Conversion flags shared by `convert` and `play`. Each one overrides the
/// matching config file value when given.
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ConversionArgs {
    /// Output width in character cells
    #[arg(long, short = 'w')]
    pub columns: Option<u32>,

    /// Character set preset
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Custom glyphs, densest first (implies --charset custom)
    #[arg(long, value_name = "CHARS")]
    pub chars: Option<String>,

    /// Brightness adjustment (-100 - 100)
    #[arg(long, allow_negative_numbers = true)]
    pub brightness: Option<i32>,

    /// Contrast in percent (25 - 200)
    #[arg(long)]
    pub contrast: Option<i32>,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Aspect ratio correction
    #[arg(long)]
    pub aspect: Option<Aspect>,

    /// Width/height ratio for --aspect custom
    #[arg(long)]
    pub ratio: Option<f64>,

    /// Colorized output (24-bit ANSI) instead of a plain ramp
    #[arg(long)]
    pub color: bool,
}

impl ConversionArgs {
    /// Merge settings: CLI args > config file > built-in defaults.
    pub fn apply_to(&self, config: &mut Config) {
        let c = &mut config.conversion;
        if let Some(columns) = self.columns {
            c.columns = columns;
        }
        let charset = self
            .charset
            .or_else(|| self.chars.as_ref().map(|_| CharacterSet::Custom));
        if let Some(charset) = charset {
            c.charset = CharSet::from(charset).name().to_string();
        }
        if let Some(chars) = &self.chars {
            c.custom_chars = Some(chars.clone());
        }
        if let Some(brightness) = self.brightness {
            c.brightness = brightness;
        }
        if let Some(contrast) = self.contrast {
            c.contrast = contrast;
        }
        if let Some(aspect) = self.aspect {
            c.aspect = aspect.name().to_string();
        }
        if let Some(ratio) = self.ratio {
            c.ratio = Some(ratio);
        }
        c.invert |= self.invert;
        c.color |= self.color;
    }
}
