//! Status Bar Widget
//!
//! Left: the current flash message, or shortcut hints for the focused
//! context. Right: conversation state, backend and version.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::app::{Flash, FlashLevel};
use crate::tui::theme::Theme;

/// Status bar widget
pub struct StatusBar<'a> {
    /// (chord, description) pairs
    hints: Vec<(String, &'static str)>,
    flash: Option<&'a Flash>,
    state_label: &'a str,
    backend_name: &'a str,
    version: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            hints: Vec::new(),
            flash: None,
            state_label: "",
            backend_name: "",
            version: "",
            theme,
        }
    }

    pub fn hints(mut self, hints: Vec<(String, &'static str)>) -> Self {
        self.hints = hints;
        self
    }

    pub fn flash(mut self, flash: Option<&'a Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn state_label(mut self, label: &'a str) -> Self {
        self.state_label = label;
        self
    }

    pub fn backend_name(mut self, name: &'a str) -> Self {
        self.backend_name = name;
        self
    }

    pub fn version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }

    fn left_line(&self) -> Line<'a> {
        if let Some(flash) = self.flash {
            let color = match flash.level {
                FlashLevel::Info => self.theme.green,
                FlashLevel::Error => self.theme.red,
            };
            return Line::from(Span::styled(
                format!(" {}", flash.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        let mut spans = vec![Span::raw(" ")];
        for (i, (chord, description)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" • ", Style::default().fg(self.theme.border)));
            }
            spans.push(Span::styled(
                chord.clone(),
                Style::default().fg(self.theme.cyan),
            ));
            spans.push(Span::styled(
                format!(" {}", description),
                Style::default().fg(self.theme.text_muted),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let right_text = format!(
            "{} · {} · v{} ",
            self.state_label, self.backend_name, self.version
        );
        let right_width = (right_text.chars().count() as u16).min(area.width / 2);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

        Paragraph::new(self.left_line()).render(left_area, buf);
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(self.theme.text_muted),
        )))
        .render(right_area, buf);
    }
}
