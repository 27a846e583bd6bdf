//! Terminal rendering of the markdown produced by `waypoint_core::display`.
//!
//! Rich output styles inline markdown with termimad and colors headers;
//! plain output prints the markdown untouched.

use std::{
    fmt::Display,
    io::{self, Write},
};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const HEADER_COLOR: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to stdout
    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        if !self.rich_enabled {
            write!(out, "{markdown}")?;
            return Ok(());
        }

        for line in markdown.lines() {
            // termimad drops the hashes of inline headers, keep them visible
            if line.starts_with('#') {
                writeln!(out, "{HEADER_COLOR}{line}{RESET}")?;
            } else {
                writeln!(out, "{}", self.skin.inline(line))?;
            }
        }
        Ok(())
    }

    /// Render anything whose `Display` output is markdown.
    pub fn show(&self, value: &impl Display) -> Result<()> {
        self.render(&value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# Title\n\n- item\n").is_ok());
    }

    #[test]
    fn test_rich_renderer_handles_headers_and_inline_markup() {
        let renderer = TerminalRenderer::new(true);
        assert!(renderer.rich_enabled);
        assert!(renderer.show(&"## Tasks (1/2)\n- **T1** `ready`").is_ok());
    }
}
