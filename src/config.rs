//! Configuration file handling for glyphreel.
//!
//! Loads configuration from `<config dir>/glyphreel/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::CharSet;
use crate::playback::DEFAULT_SPEED;
use crate::settings::{AspectMode, ConversionSettings, DEFAULT_COLUMNS, NEUTRAL_CONTRAST};

/// Configuration file structure for glyphreel.
/// Loaded from <config dir>/glyphreel/config.toml (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub columns: u32,
    pub charset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_chars: Option<String>,
    pub brightness: i32,
    pub contrast: i32,
    pub invert: bool,
    pub aspect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Use the colorized renderer instead of a glyph ramp
    pub color: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            charset: CharSet::default().name().to_string(),
            custom_chars: None,
            brightness: 0,
            contrast: NEUTRAL_CONTRAST,
            invert: false,
            aspect: AspectMode::default().name().to_string(),
            ratio: None,
            color: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speed: f32,
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            looping: true,
        }
    }
}

/// Template written by `glyphreel config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r##"# glyphreel configuration

[conversion]
# Output width in character cells (1-1000)
columns = 120
# detailed (colorized), simple, blocks, binary, dots, minimal or custom
charset = "detailed"
# Glyphs for the custom charset, densest first
# custom_chars = "#*. "
# -100 to 100
brightness = 0
# Percent, 25 to 200
contrast = 100
invert = false
# original, square, widescreen, portrait or custom
aspect = "original"
# Width/height ratio for the custom aspect
# ratio = 1.5
# Force colorized output whatever the charset
color = false

[playback]
# 0.1 to 5.0
speed = 1.0
looping = true
"##;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config = Self::parse(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build validated conversion settings.
    ///
    /// The default `detailed` charset (or `color = true`) selects the
    /// colorized renderer; every other charset maps through its ramp.
    /// Unknown charset or aspect names fall back to their defaults with a warning.
    pub fn to_settings(&self) -> ConversionSettings {
        let c = &self.conversion;
        let settings = ConversionSettings::new(c.columns)
            .with_brightness(c.brightness)
            .with_contrast(c.contrast)
            .with_invert(c.invert)
            .with_aspect_mode(self.aspect_mode());

        let charset = CharSet::from_name(&c.charset).unwrap_or_else(|| {
            log::warn!("Unknown charset '{}', using {}", c.charset, CharSet::default().name());
            CharSet::default()
        });
        if c.color || charset.is_colorized() {
            return settings.colorized();
        }

        let ramp: String = charset.resolve(c.custom_chars.as_deref()).into_iter().collect();
        settings.with_ramp(&ramp)
    }

    pub fn aspect_mode(&self) -> AspectMode {
        let c = &self.conversion;
        AspectMode::from_name(&c.aspect, c.ratio).unwrap_or_else(|| {
            log::warn!("Unknown aspect mode '{}', keeping original", c.aspect);
            AspectMode::Original
        })
    }
}

/// Write the default template to `path`, creating parent directories.
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Exists {
            path: path.to_path_buf(),
        });
    }
    let io_error = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(io_error)?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Config file '{}' already exists (use --force to overwrite)", path.display())]
    Exists { path: PathBuf },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("glyphreel").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/glyphreel/config.toml")
        })
}
