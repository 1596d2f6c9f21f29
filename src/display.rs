//! Terminal output for `glyphreel play`.
//!
//! Frames are drawn from the cursor home position so each one overwrites the
//! last, with an optional status line underneath.

use std::io::Write;

const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_SCREEN: &str = "\x1b[2J";
const HOME: &str = "\x1b[H";
const CLEAR_LINE_END: &str = "\x1b[K";
const CLEAR_BELOW: &str = "\x1b[J";
const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Status line text: `frame i/N | speed x`, with a 1-based frame number.
pub fn status_line(index: usize, count: usize, speed: f32) -> String {
    format!("frame {}/{} | speed {:.1}x", index + 1, count, speed)
}

/// Build the escape sequence that draws one frame.
pub fn compose_frame(text: &str, status: Option<&str>) -> String {
    let mut output = String::with_capacity(text.len() + 64);
    output.push_str(HOME);
    for line in text.lines() {
        output.push_str(line);
        output.push_str(CLEAR_LINE_END);
        output.push_str("\r\n");
    }
    if let Some(status) = status {
        output.push_str(RESET);
        output.push_str(DIM);
        output.push_str(status);
        output.push_str(RESET);
        output.push_str(CLEAR_LINE_END);
    }
    // Leftovers from a taller previous frame
    output.push_str(CLEAR_BELOW);
    output
}

/// Draws frames to a terminal (or any writer).
pub struct TerminalDisplay<W: Write> {
    out: W,
    show_status: bool,
    active: bool,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, show_status: bool) -> Self {
        Self {
            out,
            show_status,
            active: false,
        }
    }

    /// Clear the screen and hide the cursor.
    pub fn begin(&mut self) -> std::io::Result<()> {
        self.out.write_all(HIDE_CURSOR.as_bytes())?;
        self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        self.out.flush()?;
        self.active = true;
        Ok(())
    }

    pub fn draw(&mut self, text: &str, status: &str) -> std::io::Result<()> {
        let status = self.show_status.then_some(status);
        self.out.write_all(compose_frame(text, status).as_bytes())?;
        self.out.flush()
    }

    /// Restore the cursor. Safe to call more than once.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.out.write_all(RESET.as_bytes())?;
        self.out.write_all(SHOW_CURSOR.as_bytes())?;
        self.out.write_all(b"\r\n")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalDisplay<W> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            log::debug!("Failed to restore terminal: {}", e);
        }
    }
}
