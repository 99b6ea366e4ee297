//! OSC 52 clipboard support
//!
//! OSC 52 is a terminal escape sequence that writes to the system clipboard
//! through the terminal. It works over SSH because the local terminal
//! interprets the sequence. Used when no native clipboard is reachable.
//!
//! Format: `\x1b]52;c;BASE64_DATA\x07`

use std::io::{self, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// OSC 52 clipboard writer
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    /// Escape sequence that places `text` on the clipboard
    pub fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
    }

    /// Write text to the clipboard via stdout
    pub fn write_text(text: &str) -> io::Result<()> {
        Self::write_to(&mut io::stdout(), text)
    }

    pub fn write_to<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
        out.write_all(Self::sequence(text).as_bytes())?;
        out.flush()
    }

    /// Heuristic based on TERM / TERM_PROGRAM
    pub fn is_likely_supported() -> bool {
        let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
        let program = std::env::var("TERM_PROGRAM")
            .unwrap_or_default()
            .to_lowercase();

        const SUPPORTED: [&str; 9] = [
            "xterm", "screen", "tmux", "alacritty", "kitty", "wezterm", "foot", "iterm", "vte",
        ];
        SUPPORTED
            .iter()
            .any(|s| term.contains(s) || program.contains(s))
    }
}
