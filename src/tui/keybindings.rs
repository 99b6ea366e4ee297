//! Keybinding tables for the chat TUI
//!
//! Three tables are mounted on the keyboard hub:
//! - global: for the whole session
//! - messages: while the message list has focus and no modal is open
//! - modal: while the citation modal is open

use crossterm::event::KeyCode;

use super::shortcuts::{Shortcut, ShortcutDispatcher};

/// Actions produced by keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    /// Send the composed question
    Submit,
    /// Wipe the conversation and refocus the input
    ClearConversation,
    /// Close the modal, or return focus to the input
    Dismiss,
    /// Switch focus between input and message list
    ToggleFocus,
    /// Fill the empty input with the example question
    InsertSampleQuery,
    Quit,

    // Message list
    SelectPrevious,
    SelectNext,
    ScrollUp,
    ScrollDown,
    /// Open the nth citation (0-based) of the selected message
    OpenCitation(usize),
    CopyMessage,

    // Citation modal
    OpenLink,
    DownloadDocument,
    CopyExcerpt,
}

impl Action {
    /// Short description for the help line
    pub fn description(&self) -> &'static str {
        match self {
            Action::Submit => "send",
            Action::ClearConversation => "clear",
            Action::Dismiss => "close",
            Action::ToggleFocus => "citations",
            Action::InsertSampleQuery => "example",
            Action::Quit => "quit",
            Action::SelectPrevious => "previous",
            Action::SelectNext => "next",
            Action::ScrollUp => "scroll up",
            Action::ScrollDown => "scroll down",
            Action::OpenCitation(_) => "open citation",
            Action::CopyMessage => "copy",
            Action::OpenLink => "open",
            Action::DownloadDocument => "download",
            Action::CopyExcerpt => "copy excerpt",
        }
    }
}

/// Bindings active for the whole session
///
/// Ctrl+J and Alt+Enter double as Ctrl+Enter: most terminals deliver
/// Ctrl+Enter as a plain Enter unless the keyboard enhancement protocol is
/// available.
pub fn global_bindings() -> Vec<Shortcut<Action>> {
    vec![
        Shortcut::new(KeyCode::Enter, Action::Submit).ctrl(),
        Shortcut::new(KeyCode::Char('j'), Action::Submit).ctrl(),
        Shortcut::new(KeyCode::Enter, Action::Submit).alt(),
        Shortcut::new(KeyCode::Char('k'), Action::ClearConversation).ctrl(),
        Shortcut::new(KeyCode::Esc, Action::Dismiss),
        Shortcut::new(KeyCode::Tab, Action::ToggleFocus),
        Shortcut::new(KeyCode::BackTab, Action::ToggleFocus).shift(),
        Shortcut::new(KeyCode::Char('e'), Action::InsertSampleQuery).ctrl(),
        Shortcut::new(KeyCode::Char('c'), Action::Quit).ctrl(),
        Shortcut::new(KeyCode::Char('q'), Action::Quit).ctrl(),
    ]
}

/// Bindings active while the message list has focus
pub fn message_bindings() -> Vec<Shortcut<Action>> {
    let mut bindings = vec![
        Shortcut::new(KeyCode::Up, Action::SelectPrevious),
        Shortcut::new(KeyCode::Char('k'), Action::SelectPrevious),
        Shortcut::new(KeyCode::Down, Action::SelectNext),
        Shortcut::new(KeyCode::Char('j'), Action::SelectNext),
        Shortcut::new(KeyCode::PageUp, Action::ScrollUp),
        Shortcut::new(KeyCode::PageDown, Action::ScrollDown),
        Shortcut::new(KeyCode::Enter, Action::OpenCitation(0)),
        Shortcut::new(KeyCode::Char('y'), Action::CopyMessage),
    ];
    for n in 1..=9u8 {
        bindings.push(Shortcut::new(
            KeyCode::Char((b'0' + n) as char),
            Action::OpenCitation(usize::from(n - 1)),
        ));
    }
    bindings
}

/// Bindings active while the citation modal is open
pub fn modal_bindings() -> Vec<Shortcut<Action>> {
    vec![
        Shortcut::new(KeyCode::Char('o'), Action::OpenLink),
        Shortcut::new(KeyCode::Char('d'), Action::DownloadDocument),
        Shortcut::new(KeyCode::Char('y'), Action::CopyExcerpt),
    ]
}

pub fn global_dispatcher() -> ShortcutDispatcher<Action> {
    ShortcutDispatcher::new(global_bindings())
}

pub fn message_dispatcher() -> ShortcutDispatcher<Action> {
    ShortcutDispatcher::new(message_bindings())
}

pub fn modal_dispatcher() -> ShortcutDispatcher<Action> {
    ShortcutDispatcher::new(modal_bindings())
}

/// First chord bound to `action` in `bindings`, for hint text
pub fn chord_for(bindings: &[Shortcut<Action>], action: Action) -> Option<String> {
    bindings
        .iter()
        .find(|b| b.action == action)
        .map(Shortcut::label)
}
