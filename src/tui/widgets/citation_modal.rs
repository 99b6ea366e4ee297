//! Citation modal
//!
//! Overlay for the open citation: the highlighted excerpt, a static preview
//! of the cited paragraph and the available document actions.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::core::Citation;
use crate::tui::theme::Theme;
use crate::tui::utils::wrap_text;

pub struct CitationModalView<'a> {
    citation: &'a Citation,
    theme: &'a Theme,
    width_percent: u16,
    height_percent: u16,
}

impl<'a> CitationModalView<'a> {
    pub fn new(citation: &'a Citation, theme: &'a Theme) -> Self {
        Self {
            citation,
            theme,
            width_percent: 80,
            height_percent: 80,
        }
    }

    /// Calculate the centered area for the modal
    fn centered_rect(&self, area: Rect) -> Rect {
        let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent) / 100) as u16;
        let popup_width = scale(area.width, self.width_percent).max(area.width.min(40));
        let popup_height = scale(area.height, self.height_percent).max(area.height.min(12));

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

        Rect::new(x, y, popup_width, popup_height)
    }

    fn content(&self, width: usize) -> Vec<Line<'static>> {
        let citation = self.citation;
        let heading = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.text_muted);
        let excerpt = Style::default()
            .fg(self.theme.yellow)
            .bg(self.theme.highlight_bg)
            .add_modifier(Modifier::ITALIC);

        let mut lines = vec![
            Line::from(Span::styled(
                citation.paragraph.clone(),
                Style::default().fg(self.theme.text_secondary),
            )),
            Line::default(),
            Line::from(Span::styled("▍Highlighted Citation", heading)),
        ];
        for row in wrap_text(&format!("\"{}\"", citation.text), width.saturating_sub(2)) {
            lines.push(Line::from(vec![
                Span::styled("▍", Style::default().fg(self.theme.yellow)),
                Span::styled(row, excerpt),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(
                "Document Preview",
                Style::default()
                    .fg(self.theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" · {}", citation.reference()), muted),
        ]));

        // Simulated page: surrounding text with the excerpt highlighted in place
        let body = Style::default().fg(self.theme.text_secondary);
        let highlighted = Style::default()
            .fg(self.theme.text_primary)
            .bg(self.theme.highlight_bg);
        let page_width = width.saturating_sub(2);
        let mut page_text = |text: &str, style: Style| {
            for row in wrap_text(text, page_width) {
                lines.push(Line::from(vec![Span::raw("  "), Span::styled(row, style)]));
            }
        };
        if let Some(preceding) = &citation.preceding {
            page_text(preceding, body);
        }
        page_text(&citation.text, highlighted);
        if let Some(following) = &citation.following {
            page_text(following, muted);
        }

        lines.push(Line::from(Span::styled(
            "─".repeat(width.min(60)),
            Style::default().fg(self.theme.border),
        )));
        lines.push(Line::from(Span::styled(
            crate::tui::utils::truncate(&citation.link, width),
            Style::default()
                .fg(self.theme.blue)
                .add_modifier(Modifier::UNDERLINED),
        )));
        lines
    }

    fn actions_line(&self) -> Line<'static> {
        let key = Style::default()
            .fg(self.theme.cyan)
            .add_modifier(Modifier::BOLD);
        let label = Style::default().fg(self.theme.text_secondary);
        Line::from(vec![
            Span::styled("o", key),
            Span::styled(" Open original   ", label),
            Span::styled("d", key),
            Span::styled(" Download PDF   ", label),
            Span::styled("y", key),
            Span::styled(" Copy excerpt   ", label),
            Span::styled("Esc", key),
            Span::styled(" Close", label),
        ])
    }
}

impl Widget for CitationModalView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal_area = self.centered_rect(area);

        // Clear the area behind the modal
        Clear.render(modal_area, buf);

        let block = Block::default()
            .title(format!(" {} ", self.citation.source))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused))
            .style(Style::default().bg(self.theme.bg_dark));

        let inner = block.inner(modal_area);
        block.render(modal_area, buf);

        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let padded = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height - 1,
        );
        Paragraph::new(self.content(padded.width as usize)).render(padded, buf);

        let footer = Rect::new(inner.x + 1, inner.y + inner.height - 1, padded.width, 1);
        Paragraph::new(self.actions_line()).render(footer, buf);
    }
}
