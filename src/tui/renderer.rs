//! Frame rendering
//!
//! Lays out the chat screen and draws every widget from [`AppState`]:
//!
//! ```text
//! ┌ header ──────────────────────────┐
//! │ messages / welcome               │
//! │                                  │
//! ├ input ───────────────────────────┤
//! └ status bar ──────────────────────┘
//! ```
//!
//! The citation modal is drawn on top when open.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use super::app::{AppState, FocusedComponent};
use super::config::AppConfig;
use super::keybindings::{chord_for, global_bindings, message_bindings, Action};
use super::shortcuts::Shortcut;
use super::theme::Theme;
use super::widgets::{CitationModalView, Header, InputWidget, MessageArea, StatusBar, Welcome};

/// Input box height including borders
const INPUT_HEIGHT: u16 = 5;

/// Facts about the drawn frame the state needs back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub max_scroll: usize,
}

/// Everything the renderer needs besides the state
pub struct RenderContext<'a> {
    pub config: &'a AppConfig,
    pub theme: &'a Theme,
    pub sample_query: &'a str,
}

/// Split the screen into header, messages, input and status rows
pub fn screen_layout(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Shortcut hints for the focused context
pub fn hints_for(state: &AppState) -> Vec<(String, &'static str)> {
    let global = global_bindings();
    let messages = message_bindings();
    let pick = |bindings: &[Shortcut<Action>], action: Action| {
        chord_for(bindings, action).map(|chord| (chord, action.description()))
    };

    let wanted: Vec<Option<(String, &'static str)>> = if state.modal.is_open() {
        vec![pick(&global, Action::Dismiss)]
    } else if state.focus == FocusedComponent::Messages {
        vec![
            Some(("↑↓".to_string(), "select")),
            Some(("Enter/1-9".to_string(), "open citation")),
            pick(&messages, Action::CopyMessage),
            pick(&global, Action::ToggleFocus).map(|(chord, _)| (chord, "input")),
        ]
    } else {
        let mut hints = vec![
            pick(&global, Action::Submit),
            pick(&global, Action::ClearConversation),
        ];
        if state.conversation.is_empty() {
            hints.push(pick(&global, Action::InsertSampleQuery));
        } else {
            hints.push(pick(&global, Action::ToggleFocus));
        }
        hints.push(pick(&global, Action::Quit));
        hints
    };
    wanted.into_iter().flatten().collect()
}

/// Draw one frame
pub fn render(frame: &mut Frame, state: &AppState, ctx: &RenderContext) -> RenderReport {
    let theme = ctx.theme;
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg_main)),
        area,
    );

    let [header_area, messages_area, input_area, status_area] = screen_layout(area);

    frame.render_widget(
        Header::new(ctx.config, theme).show_clear(!state.conversation.is_empty()),
        header_area,
    );

    let mut report = RenderReport::default();
    if state.conversation.is_empty() {
        frame.render_widget(Welcome::new(ctx.config, theme, ctx.sample_query), messages_area);
    } else {
        let messages = MessageArea::new(state, ctx.config, theme);
        report.max_scroll = messages.max_scroll(messages_area);
        frame.render_widget(messages, messages_area);
    }

    frame.render_widget(
        InputWidget::new(state.input.text(), state.input.cursor(), theme)
            .focused(state.focus == FocusedComponent::Input && !state.modal.is_open())
            .disabled(state.is_loading()),
        input_area,
    );

    frame.render_widget(
        StatusBar::new(theme)
            .hints(hints_for(state))
            .flash(state.flash.as_ref())
            .state_label(state.conversation_state().as_str())
            .backend_name(&state.backend_name)
            .version(&ctx.config.version),
        status_area,
    );

    if let Some(citation) = state.modal.selection() {
        frame.render_widget(CitationModalView::new(citation, theme), area);
    }

    report
}
