//! Header Widget
//!
//! Displays the assistant name and, once a conversation exists, the clear hint

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::config::AppConfig;
use crate::tui::theme::Theme;

/// Header widget showing the assistant name
pub struct Header<'a> {
    config: &'a AppConfig,
    theme: &'a Theme,
    /// Show the "clear chat" hint on the right
    show_clear: bool,
}

impl<'a> Header<'a> {
    pub fn new(config: &'a AppConfig, theme: &'a Theme) -> Self {
        Self {
            config,
            theme,
            show_clear: false,
        }
    }

    pub fn show_clear(mut self, show: bool) -> Self {
        self.show_clear = show;
        self
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        // Format: "⚖ Lexi Legal Assistant"
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.config.header_icon),
                Style::default().fg(self.theme.yellow),
            ),
            Span::styled(
                &self.config.app_name,
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(title).render(area, buf);

        if self.show_clear {
            let hint = Line::from(vec![
                Span::styled("Clear chat ", Style::default().fg(self.theme.text_secondary)),
                Span::styled("Ctrl+K ", Style::default().fg(self.theme.text_muted)),
            ]);
            Paragraph::new(hint)
                .alignment(Alignment::Right)
                .render(area, buf);
        }
    }
}
