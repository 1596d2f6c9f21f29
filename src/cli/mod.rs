//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction, ConversionArgs};
pub use commands::{
    convert_file, handle_config_action, list_charsets, resolve_config, run_convert, run_play,
    CliError, PlayOptions,
};
pub use enums::{Aspect, CharacterSet};
