//! Chat application state and terminal lifecycle
//!
//! [`AppState`] owns the conversation state machine, the citation modal and
//! everything the widgets need to draw a frame. It never touches the
//! terminal; the controller feeds it actions and the renderer reads it.

use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::{
    Answer, BackendError, Citation, CitationModal, ConversationError, ConversationManager,
    ConversationState, Message, PendingRequest, Transition,
};

/// How long a status flash stays visible
pub const FLASH_TTL: Duration = Duration::from_secs(4);

/// Lines moved per PgUp/PgDn or wheel notch
pub const SCROLL_STEP: usize = 3;

/// Which component receives unbound keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedComponent {
    #[default]
    Input,
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Error,
}

/// Transient status line message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub text: String,
    pub level: FlashLevel,
    pub expires_at: Instant,
}

/// Multi-line text being composed; `cursor` is a byte offset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        // Normalize CRLF from pasted text
        let s = s.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(self.cursor, &s);
        self.cursor += s.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    /// Start of the current line
    pub fn move_home(&mut self) {
        self.cursor = self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    /// End of the current line
    pub fn move_end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().last().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Apply an editing key; returns false when the key is not an edit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let mods = key.modifiers;
        if mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Enter => self.insert_char('\n'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

/// Everything a frame is drawn from
#[derive(Debug)]
pub struct AppState {
    pub conversation: ConversationManager,
    pub modal: CitationModal,
    pub focus: FocusedComponent,
    pub input: InputBuffer,
    /// Message highlighted in the focused message list
    pub selected: Option<usize>,
    /// Lines scrolled up from the newest content
    pub scroll_back: usize,
    /// Keep the selected message in view instead of honouring `scroll_back`
    pub follow_selection: bool,
    max_scroll: usize,
    pub flash: Option<Flash>,
    /// Animation counter, advanced on every tick
    pub tick: u64,
    pub should_quit: bool,
    pub backend_name: String,
    pub downloads_in_flight: usize,
}

impl AppState {
    pub fn new(backend_name: impl Into<String>) -> Self {
        Self {
            conversation: ConversationManager::new(),
            modal: CitationModal::new(),
            focus: FocusedComponent::Input,
            input: InputBuffer::default(),
            selected: None,
            scroll_back: 0,
            follow_selection: false,
            max_scroll: 0,
            flash: None,
            tick: 0,
            should_quit: false,
            backend_name: backend_name.into(),
            downloads_in_flight: 0,
        }
    }

    pub fn conversation_state(&self) -> ConversationState {
        self.conversation.state()
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.conversation.is_loading()
    }

    /// The input accepts edits only while no request is pending
    pub fn input_editable(&self) -> bool {
        !self.is_loading() && !self.modal.is_open() && self.focus == FocusedComponent::Input
    }

    /// Send the composed question
    ///
    /// Blank input and a pending request are silent no-ops. On success the
    /// input is cleared and the pending request is returned for dispatch.
    pub fn submit_input(&mut self) -> Option<PendingRequest> {
        match self.conversation.submit(self.input.text()) {
            Ok((request, transition)) => {
                self.input.clear();
                self.apply_transition(transition);
                Some(request)
            }
            Err(ConversationError::BlankInput) => None,
            Err(e) => {
                tracing::debug!(error = %e, "submit ignored");
                None
            }
        }
    }

    /// Hand a backend result to the state machine; stale results are dropped
    pub fn complete_request(&mut self, request_id: u64, result: Result<Answer, BackendError>) {
        match self.conversation.complete(request_id, result) {
            Ok(transition) => self.apply_transition(transition),
            Err(e) => tracing::debug!(error = %e, "response discarded"),
        }
    }

    /// Wipe the conversation, close the modal and refocus the input
    pub fn clear_conversation(&mut self) {
        let transition = self.conversation.clear();
        self.modal.close();
        self.input.clear();
        self.focus = FocusedComponent::Input;
        self.apply_transition(transition);
    }

    fn apply_transition(&mut self, transition: Transition) {
        if transition.to == ConversationState::Empty {
            self.selected = None;
        }
        if transition.scrolls_to_latest() {
            self.scroll_to_latest();
        }
    }

    /// Jump to the newest message
    pub fn scroll_to_latest(&mut self) {
        self.scroll_back = 0;
        self.follow_selection = false;
    }

    pub fn insert_sample_query(&mut self, sample: &str) {
        if self.input.is_empty() && !self.is_loading() {
            self.input.set_text(sample);
            self.focus = FocusedComponent::Input;
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusedComponent::Input if !self.conversation.is_empty() => {
                if self.selected.is_none() {
                    self.selected = self.latest_with_citations().or(Some(self.last_index()));
                }
                self.follow_selection = true;
                FocusedComponent::Messages
            }
            FocusedComponent::Input => FocusedComponent::Input,
            FocusedComponent::Messages => FocusedComponent::Input,
        };
    }

    pub fn focus_input(&mut self) {
        self.focus = FocusedComponent::Input;
    }

    fn last_index(&self) -> usize {
        self.conversation.message_count().saturating_sub(1)
    }

    fn latest_with_citations(&self) -> Option<usize> {
        self.messages()
            .iter()
            .rposition(|m| !m.citations.is_empty())
    }

    pub fn select_previous(&mut self) {
        if self.conversation.is_empty() {
            return;
        }
        let current = self.selected.unwrap_or(self.last_index() + 1);
        self.selected = Some(current.saturating_sub(1));
        self.follow_selection = true;
    }

    pub fn select_next(&mut self) {
        if self.conversation.is_empty() {
            return;
        }
        let next = self.selected.map(|i| i + 1).unwrap_or(0);
        self.selected = Some(next.min(self.last_index()));
        self.follow_selection = true;
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.selected.and_then(|i| self.messages().get(i))
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow_selection = false;
        self.scroll_back = (self.scroll_back + lines).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.follow_selection = false;
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Record how far the last frame could scroll
    pub fn set_max_scroll(&mut self, max_scroll: usize) {
        self.max_scroll = max_scroll;
        self.scroll_back = self.scroll_back.min(max_scroll);
    }

    /// Open the citation modal on the nth citation of the selected message
    ///
    /// Returns false when the selected message has no such citation.
    pub fn open_citation(&mut self, index: usize) -> bool {
        let citation: Option<Citation> = self
            .selected_message()
            .and_then(|m| m.citations.get(index))
            .cloned();
        match citation {
            Some(citation) => {
                self.modal.open_with(citation);
                true
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    pub fn flash(&mut self, text: impl Into<String>, level: FlashLevel) {
        self.flash = Some(Flash {
            text: text.into(),
            level,
            expires_at: Instant::now() + FLASH_TTL,
        });
    }

    pub fn expire_flash(&mut self, now: Instant) {
        if self.flash.as_ref().is_some_and(|f| f.expires_at <= now) {
            self.flash = None;
        }
    }
}

/// Set up the terminal for TUI rendering
///
/// Keyboard enhancement is requested where supported so Ctrl+Enter reaches
/// the app as its own chord.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    if supports_keyboard_enhancement().unwrap_or(false) {
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        );
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    if supports_keyboard_enhancement().unwrap_or(false) {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        stdout,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture,
        crossterm::cursor::Show
    )?;
    Ok(())
}

/// Install a panic hook that restores the terminal before panicking
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
