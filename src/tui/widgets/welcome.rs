//! Welcome screen
//!
//! Shown in the message area while the conversation is empty: a greeting,
//! the example question and the main shortcuts.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::config::AppConfig;
use crate::tui::theme::Theme;
use crate::tui::utils::wrap_text;

pub struct Welcome<'a> {
    config: &'a AppConfig,
    theme: &'a Theme,
    sample_query: &'a str,
}

impl<'a> Welcome<'a> {
    pub fn new(config: &'a AppConfig, theme: &'a Theme, sample_query: &'a str) -> Self {
        Self {
            config,
            theme,
            sample_query,
        }
    }
}

impl Widget for Welcome<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 4 {
            return;
        }
        let text_width = (area.width as usize).saturating_sub(8).clamp(1, 72);
        let muted = Style::default().fg(self.theme.text_muted);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{}  Welcome to {}", self.config.header_icon, self.config.app_name),
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask questions about case law and get answers with cited judgments.",
                Style::default().fg(self.theme.text_secondary),
            )),
            Line::default(),
            Line::from(Span::styled("Try asking:", muted)),
        ];
        for row in wrap_text(self.sample_query, text_width) {
            lines.push(Line::from(Span::styled(
                row,
                Style::default()
                    .fg(self.theme.blue)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Ctrl+E", Style::default().fg(self.theme.cyan)),
            Span::styled(" use this example   ", muted),
            Span::styled("Ctrl+Enter", Style::default().fg(self.theme.cyan)),
            Span::styled(" send   ", muted),
            Span::styled("Ctrl+Q", Style::default().fg(self.theme.cyan)),
            Span::styled(" quit", muted),
        ]));

        // Vertically center
        let height = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(height) / 2;
        let inner = Rect::new(area.x, top, area.width, height.min(area.height));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_welcome_shows_sample_query() {
        let backend = TestBackend::new(100, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        let config = AppConfig::default();
        let theme = Theme::default();

        terminal
            .draw(|f| {
                f.render_widget(
                    Welcome::new(&config, &theme, "Is a widow entitled to compensation?"),
                    f.area(),
                );
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = (0..16)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .map(|(x, y)| buffer.cell((x, y)).unwrap().symbol().to_string())
            .collect();

        assert!(content.contains("Welcome to Lexi Legal Assistant"));
        assert!(content.contains("Is a widow entitled to compensation?"));
        assert!(content.contains("Ctrl+E"));
    }
}
