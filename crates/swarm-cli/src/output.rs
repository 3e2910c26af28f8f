//! Shared colored output utilities for the demo commands.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use clap::ValueEnum;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Value of the `--color` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(mode: ColorMode) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto => ColorChoice::Auto,
    }
}

/// Styled output writer for terminal.
pub struct StyledOutput {
    stdout: StandardStream,
}

impl StyledOutput {
    /// Create a new styled output with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    /// Write a line with a specific color and style.
    fn writeln_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = writeln!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
        let _ = self.stdout.flush();
    }

    /// Bold heading naming the demo being run.
    pub fn heading(&mut self, text: &str) {
        self.writeln_styled(text, None, true);
    }

    /// Green bold line.
    pub fn success(&mut self, text: &str) {
        self.writeln_styled(text, Some(Color::Green), true);
    }

    /// Yellow bold line.
    pub fn warning(&mut self, text: &str) {
        self.writeln_styled(text, Some(Color::Yellow), true);
    }

    /// Cyan line.
    pub fn info(&mut self, text: &str) {
        self.writeln_styled(text, Some(Color::Cyan), false);
    }
}
