//! Subcommand handlers for convert, play, charsets and config actions.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::args::{ConfigAction, ConversionArgs};
use crate::ascii::CharSet;
use crate::config::{self, default_path as get_config_path, Config, ConfigError};
use crate::convert::{ConversionError, ConversionPipeline, Progress};
use crate::decode::decode_file;
use crate::display::{status_line, TerminalDisplay};
use crate::frame::{AsciiAnimation, DecodeError, RawFrame};
use crate::playback::{PlaybackEvent, DEFAULT_SPEED};
use crate::session::AnimationSession;

/// Set by the Ctrl+C handler, polled by `play`.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// Errors surfaced by subcommands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("Frame {index} is out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },
    #[error("Failed to render configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to set Ctrl+C handler: {0}")]
    CtrlC(#[from] ctrlc::Error),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for `glyphreel play` beyond the conversion flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub speed: Option<f32>,
    pub no_loop: bool,
    pub show_status: bool,
}

/// Load the config file and overlay the command-line conversion flags.
pub fn resolve_config(
    config_path: Option<&Path>,
    conversion: &ConversionArgs,
) -> Result<Config, ConfigError> {
    let mut config = Config::load(config_path)?;
    conversion.apply_to(&mut config);
    Ok(config)
}

/// Decode and convert `file`, returning the finished animation.
pub fn convert_file(file: &Path, config: &Config) -> Result<AsciiAnimation, CliError> {
    let frames = decode_file(file)?;
    let animation = ConversionPipeline::new(config.to_settings())
        .spawn(frames)?
        .blocking_wait()?;
    Ok(animation)
}

/// Print the converted frames (or one of them) to stdout.
pub fn run_convert(
    file: &Path,
    conversion: &ConversionArgs,
    frame: Option<usize>,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = resolve_config(config_path, conversion)?;
    let animation = convert_file(file, &config)?;

    match frame {
        Some(index) => {
            let frame = animation.frame(index).ok_or(CliError::FrameOutOfRange {
                index,
                count: animation.len(),
            })?;
            println!("{}", frame);
        }
        None => {
            for (i, frame) in animation.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", frame);
            }
        }
    }
    Ok(())
}

/// Play `file` in the terminal until it finishes or Ctrl+C is pressed.
pub fn run_play(
    file: &Path,
    conversion: &ConversionArgs,
    options: PlayOptions,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = resolve_config(config_path, conversion)?;
    let frames = decode_file(file)?;
    setup_ctrlc_handler()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(play(frames, &config, options))
}

async fn play(
    frames: Vec<RawFrame>,
    config: &Config,
    options: PlayOptions,
) -> Result<(), CliError> {
    let handle = ConversionPipeline::new(config.to_settings()).spawn(frames)?;
    let cancel = handle.cancel_token();
    let watcher = tokio::spawn(async move {
        wait_for_interrupt().await;
        cancel.cancel();
    });

    let show_progress = std::io::stderr().is_terminal();
    let result = handle
        .wait_with_progress(|p: Progress| {
            if show_progress {
                eprint!("\rConverting frame {}/{}", p.frames_done, p.frames_total);
            }
        })
        .await;
    watcher.abort();
    if show_progress {
        eprint!("\r\x1b[K");
    }

    let animation = match result {
        Err(e) if e.is_cancelled() => return Ok(()),
        other => other?,
    };

    let count = animation.len();
    let (mut session, mut events) = AnimationSession::new();
    session.load(animation);
    session.set_speed(options.speed.unwrap_or(config.playback.speed));
    session.set_looping(config.playback.looping && !options.no_loop);
    let speed = session.speed().unwrap_or(DEFAULT_SPEED);

    let mut display = TerminalDisplay::new(std::io::stdout(), options.show_status);
    display.begin()?;
    session.play();

    loop {
        tokio::select! {
            _ = session.tick() => {}
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(PlaybackEvent::FrameChanged { index, text }) => {
                        display.draw(&text, &status_line(index, count, speed))?;
                    }
                    Some(PlaybackEvent::Finished) | None => break,
                }
            }
            _ = wait_for_interrupt() => break,
        }
    }

    display.finish()?;
    Ok(())
}

async fn wait_for_interrupt() {
    while !CTRLC_RECEIVED.load(Ordering::SeqCst) {
        tokio::time::sleep(INTERRUPT_POLL).await;
    }
}

fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

/// List character set presets with a preview of each ramp.
pub fn list_charsets() {
    println!("Character sets:");
    for charset in CharSet::ALL {
        if charset == CharSet::Custom {
            continue;
        }
        println!(
            "  {:<10} {:<20} {}",
            charset.name(),
            charset.display_name(),
            charset.preview(None)
        );
        println!("  {:<10} {}", "", charset.description());
    }
    println!();
    println!("Use --charset <name>, or --chars \"<glyphs>\" for a custom set (densest first).");
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&path))?;
            let settings = config.to_settings();
            println!("# Effective configuration");
            println!("# Adjustments: {}", settings.adjustment_summary());
            println!("# Aspect: {}", settings.aspect_mode().display_name());
            print!("{}", config.to_toml()?);
            println!();
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", path.display());
            }
        }
        ConfigAction::Init { force } => {
            config::write_default(&path, force)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
