//! Input Widget
//!
//! Multi-line question composer with a block cursor. Read-only while an
//! answer is pending.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::tui::theme::Theme;

pub const PLACEHOLDER: &str = "Ask a legal question...";
pub const PENDING_PLACEHOLDER: &str = "Waiting for the answer...";

/// Input widget for composing questions
pub struct InputWidget<'a> {
    content: &'a str,
    /// Byte offset of the cursor
    cursor: usize,
    focused: bool,
    disabled: bool,
    theme: &'a Theme,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            content,
            cursor,
            focused: false,
            disabled: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Char-wrap `content` to `width`; returns the rows and the cursor's (row, col)
pub(crate) fn layout_rows(content: &str, cursor: usize, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col = 0;
    let mut cursor_pos = None;

    for (i, c) in content.char_indices() {
        if i == cursor {
            cursor_pos = Some((rows.len() - 1, col));
        }
        if c == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        let cw = c.width().unwrap_or(0);
        if col + cw > width {
            rows.push(String::new());
            col = 0;
            if i == cursor {
                cursor_pos = Some((rows.len() - 1, 0));
            }
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += cw;
    }

    let cursor_pos = cursor_pos.unwrap_or_else(|| {
        if col >= width {
            rows.push(String::new());
            (rows.len() - 1, 0)
        } else {
            (rows.len() - 1, col)
        }
    });
    (rows, cursor_pos)
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_color = if self.disabled {
            self.theme.text_muted
        } else if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Question ")
            .title(
                Title::from(Span::styled(
                    " Ctrl+Enter send ",
                    Style::default().fg(self.theme.text_muted),
                ))
                .alignment(Alignment::Right),
            );

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        if self.content.is_empty() {
            let placeholder = if self.disabled {
                PENDING_PLACEHOLDER
            } else {
                PLACEHOLDER
            };
            let mut spans = Vec::new();
            if self.focused && !self.disabled {
                spans.push(Span::styled(
                    " ",
                    Style::default().bg(self.theme.text_primary),
                ));
            }
            spans.push(Span::styled(
                placeholder,
                Style::default()
                    .fg(self.theme.text_muted)
                    .add_modifier(Modifier::ITALIC),
            ));
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        let (rows, (cursor_row, cursor_col)) =
            layout_rows(self.content, self.cursor, inner.width as usize);
        let height = inner.height as usize;
        // Keep the cursor row visible
        let first = (cursor_row + 1).saturating_sub(height);
        let text_style = if self.disabled {
            Style::default().fg(self.theme.text_muted)
        } else {
            Style::default().fg(self.theme.text_primary)
        };

        let lines: Vec<Line> = rows
            .iter()
            .skip(first)
            .take(height)
            .map(|row| Line::from(Span::styled(row.as_str(), text_style)))
            .collect();
        Paragraph::new(lines).render(inner, buf);

        if self.focused && !self.disabled {
            let x = inner.x + cursor_col.min(inner.width as usize - 1) as u16;
            let y = inner.y + (cursor_row - first) as u16;
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(
                    Style::default()
                        .fg(self.theme.bg_main)
                        .bg(self.theme.text_primary),
                );
            }
        }
    }
}
