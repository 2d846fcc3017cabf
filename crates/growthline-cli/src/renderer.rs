//! Markdown rendering to the terminal, with a plain-text fallback.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Green);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Prints `markdown`, styled when rich output is enabled.
    ///
    /// Tables (the timeline overview) are rendered as a block so the columns
    /// line up; every other line is styled on its own so header markers stay
    /// visible.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut table = String::new();
        for line in markdown.lines() {
            if line.starts_with('|') {
                table.push_str(line);
                table.push('\n');
                continue;
            }
            if !table.is_empty() {
                self.skin.print_text(&table);
                table.clear();
            }
            if line.starts_with('#') {
                println!("\x1b[32m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        if !table.is_empty() {
            self.skin.print_text(&table);
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
