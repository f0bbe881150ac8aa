//! Waiting indicators
//!
//! Frames for the in-transcript typing indicator, and a console spinner for
//! one-shot commands that print straight to the terminal.

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Spinner animation frames - braille pattern spinner
pub const SPINNER_BRAILLE: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Typing indicator frames - elegant dots
pub const TYPING_DOTS: [&str; 8] = ["·  ", "·· ", "···", " ··", "  ·", "   ", "   ", "·  "];

/// Typing indicator frame for the given UI tick
pub fn typing_frame(tick: usize) -> &'static str {
    TYPING_DOTS[tick % TYPING_DOTS.len()]
}

/// An animated braille spinner for console output (writes to stderr)
pub struct Spinner {
    frames: Vec<String>,
    current_frame: usize,
    message: String,
    last_update: Instant,
    frame_duration: Duration,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            frames: SPINNER_BRAILLE.iter().map(|c| c.to_string()).collect(),
            current_frame: 0,
            message: String::new(),
            last_update: Instant::now(),
            frame_duration: Duration::from_millis(80),
        }
    }

    pub fn with_message(mut self, msg: &str) -> Self {
        self.message = msg.to_string();
        self
    }

    /// Start the spinner (hides cursor)
    pub fn start(&self) {
        let _ = execute!(io::stderr(), Hide);
        self.render();
    }

    /// Stop the spinner (shows cursor, clears line)
    pub fn stop(&self) {
        let _ = execute!(
            io::stderr(),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Show
        );
    }

    /// Update the spinner animation (call in a loop)
    pub fn tick(&mut self) {
        if self.last_update.elapsed() >= self.frame_duration {
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            self.last_update = Instant::now();
            self.render();
        }
    }

    fn render(&self) {
        let frame = &self.frames[self.current_frame];
        let _ = execute!(
            io::stderr(),
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 140, g: 140, b: 140 }),
            Print(format!("  {} ", frame)),
            SetForegroundColor(Color::Rgb { r: 180, g: 180, b: 180 }),
            Print(&self.message),
            ResetColor
        );
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_frame_wraps() {
        assert_eq!(typing_frame(0), TYPING_DOTS[0]);
        assert_eq!(typing_frame(TYPING_DOTS.len() + 2), TYPING_DOTS[2]);
    }
}
