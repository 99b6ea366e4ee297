//! Message Area Widget
//!
//! Scrollable conversation view: user and assistant messages, numbered
//! citations under each answer and the loading indicator while a request
//! is pending.

use std::ops::Range;

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::{Message, MessageRole};
use crate::tui::app::{AppState, FocusedComponent};
use crate::tui::config::AppConfig;
use crate::tui::theme::Theme;
use crate::tui::utils::wrap_text;

/// Braille spinner frames for the loading indicator
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const LOADING_TEXT: &str = "Analyzing your query...";

/// Columns taken by the selection marker and indent
const GUTTER: usize = 3;

pub struct MessageArea<'a> {
    state: &'a AppState,
    config: &'a AppConfig,
    theme: &'a Theme,
}

/// Flattened lines plus the line range each message occupies
struct Layout {
    lines: Vec<Line<'static>>,
    ranges: Vec<Range<usize>>,
}

impl<'a> MessageArea<'a> {
    pub fn new(state: &'a AppState, config: &'a AppConfig, theme: &'a Theme) -> Self {
        Self {
            state,
            config,
            theme,
        }
    }

    fn focused(&self) -> bool {
        self.state.focus == FocusedComponent::Messages && !self.state.modal.is_open()
    }

    /// Greatest `scroll_back` that still shows content in `area`
    pub fn max_scroll(&self, area: Rect) -> usize {
        let layout = self.layout(area.width as usize);
        layout.lines.len().saturating_sub(area.height as usize)
    }

    fn layout(&self, width: usize) -> Layout {
        let text_width = width.saturating_sub(GUTTER).max(1);
        let mut lines = Vec::new();
        let mut ranges = Vec::new();

        for (index, message) in self.state.messages().iter().enumerate() {
            let start = lines.len();
            let selected = self.focused() && self.state.selected == Some(index);
            self.push_message(&mut lines, message, selected, text_width);
            ranges.push(start..lines.len());
            lines.push(Line::default());
        }

        if self.state.is_loading() {
            let frame = SPINNER[(self.state.tick % SPINNER.len() as u64) as usize];
            lines.push(self.role_line(MessageRole::Assistant, None, false));
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(GUTTER)),
                Span::styled(format!("{} ", frame), Style::default().fg(self.theme.yellow)),
                Span::styled(
                    LOADING_TEXT,
                    Style::default()
                        .fg(self.theme.text_secondary)
                        .add_modifier(Modifier::ITALIC),
                ),
            ]));
        }

        Layout { lines, ranges }
    }

    fn marker(&self, selected: bool) -> Span<'static> {
        if selected {
            Span::styled("▌  ", Style::default().fg(self.theme.border_focused))
        } else {
            Span::raw(" ".repeat(GUTTER))
        }
    }

    fn role_line(
        &self,
        role: MessageRole,
        message: Option<&Message>,
        selected: bool,
    ) -> Line<'static> {
        let (label, color) = match role {
            MessageRole::User => (&self.config.user_label, self.theme.user_bubble),
            MessageRole::Assistant => (&self.config.assistant_label, self.theme.assistant_bubble),
        };
        let mut spans = vec![
            if selected {
                Span::styled("▌ ", Style::default().fg(self.theme.border_focused))
            } else {
                Span::raw(" ")
            },
            Span::styled(
                label.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(message) = message {
            if self.config.show_timestamps {
                let time = message.timestamp.with_timezone(&Local).format("%H:%M");
                spans.push(Span::styled(
                    format!(" · {}", time),
                    Style::default().fg(self.theme.text_muted),
                ));
            }
        }
        Line::from(spans)
    }

    fn push_message(
        &self,
        lines: &mut Vec<Line<'static>>,
        message: &Message,
        selected: bool,
        width: usize,
    ) {
        lines.push(self.role_line(message.role, Some(message), selected));

        let body_style = if message.failed {
            Style::default().fg(self.theme.red)
        } else {
            Style::default().fg(self.theme.text_primary)
        };
        let content = if message.failed {
            format!("⚠ {}", message.content)
        } else {
            message.content.clone()
        };
        for row in wrap_text(&content, width) {
            lines.push(Line::from(vec![
                self.marker(selected),
                Span::styled(row, body_style),
            ]));
        }

        for (n, citation) in message.citations.iter().enumerate() {
            lines.push(Line::from(vec![self.marker(selected)]));
            lines.push(Line::from(vec![
                self.marker(selected),
                Span::styled(
                    format!("[{}] ", n + 1),
                    Style::default()
                        .fg(self.theme.yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(citation.source.clone(), Style::default().fg(self.theme.cyan)),
                Span::styled(
                    format!(" · {}", citation.paragraph),
                    Style::default().fg(self.theme.text_muted),
                ),
            ]));
            let quoted = format!("\"{}\"", citation.text);
            for row in wrap_text(&quoted, width.saturating_sub(4).max(1)) {
                lines.push(Line::from(vec![
                    self.marker(selected),
                    Span::raw("    "),
                    Span::styled(
                        row,
                        Style::default()
                            .fg(self.theme.text_secondary)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]));
            }
        }
    }

    /// First visible line
    fn offset(&self, layout: &Layout, height: usize) -> usize {
        let bottom = layout.lines.len().saturating_sub(height);
        if self.state.follow_selection {
            if let Some(range) = self.state.selected.and_then(|i| layout.ranges.get(i)) {
                return if range.start >= bottom {
                    bottom
                } else {
                    range.start
                };
            }
        }
        bottom.saturating_sub(self.state.scroll_back)
    }
}

impl Widget for MessageArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }
        let layout = self.layout(area.width as usize);
        let height = area.height as usize;
        let offset = self.offset(&layout, height);
        let hidden_below = layout.lines.len().saturating_sub(offset + height);

        Paragraph::new(layout.lines)
            .scroll((offset.min(u16::MAX as usize) as u16, 0))
            .render(area, buf);

        if hidden_below > 0 {
            let last = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
            Paragraph::new(Line::from(Span::styled(
                format!("▼ {} more ", hidden_below),
                Style::default().fg(self.theme.text_muted),
            )))
            .alignment(Alignment::Right)
            .render(last, buf);
        }
    }
}
