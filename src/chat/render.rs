//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the REPL can
//! print to a terminal or to a buffer under test.

use std::io::{self, Stdout, Write};

/// ANSI escape code for bold text (used for the assistant label).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for cyan text (used for the assistant label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for dim text (used for informational messages).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print an assistant reply under the given label.
    fn print_reply(&mut self, name: &str, text: &str);

    /// Print an error message. Implementations prefix it with `Error: `.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new renderer with colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new renderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, name: &str, text: &str) {
        let label = self.styled(&format!("{ANSI_BOLD}{ANSI_CYAN}"), &format!("{name}:"));
        let _ = writeln!(self.stdout, "{label} {text}\n");
        let _ = self.stdout.flush();
    }

    fn print_error(&mut self, error: &str) {
        let line = self.styled(ANSI_RED, &format!("Error: {error}"));
        let _ = writeln!(self.stdout, "{line}");
        let _ = self.stdout.flush();
    }

    fn print_info(&mut self, info: &str) {
        let line = self.styled(ANSI_DIM, info);
        let _ = writeln!(self.stdout, "{line}");
        let _ = self.stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_respects_color_setting() {
        let plain = PlainTextRenderer::with_color(false);
        assert_eq!(plain.styled(ANSI_RED, "boom"), "boom");

        let colored = PlainTextRenderer::with_color(true);
        assert_eq!(colored.styled(ANSI_RED, "boom"), "\x1b[31mboom\x1b[0m");
    }
}
