//! Event handling for the TUI
//!
//! Handles keyboard, mouse, and terminal events using crossterm. The
//! controller reads events through [`EventSource`] so tests can script them.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{
    self, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseEvent,
};

/// Events that can occur in the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed (or released, on terminals that report it)
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Paste event (bracketed paste)
    Paste(String),
    /// Tick event for periodic updates
    Tick,
}

impl Event {
    /// Build a key press event
    pub fn key(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    /// Check if this is a resize event
    pub fn is_resize(&self) -> bool {
        matches!(self, Event::Resize(_, _))
    }
}

/// Anything that yields terminal events
pub trait EventSource {
    /// Wait for the next event; yields [`Event::Tick`] when nothing happens
    fn next_event(&mut self) -> anyhow::Result<Event>;
}

/// Reads events from the real terminal
#[derive(Debug)]
pub struct CrosstermEventSource {
    /// Tick rate for periodic updates
    tick_rate: Duration,
}

impl CrosstermEventSource {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Convert a crossterm event to our Event type
    fn convert_event(event: event::Event) -> Event {
        match event {
            event::Event::Key(key) => Event::Key(key),
            event::Event::Mouse(mouse) => Event::Mouse(mouse),
            event::Event::Resize(cols, rows) => Event::Resize(cols, rows),
            event::Event::Paste(text) => Event::Paste(text),
            // FocusGained, FocusLost are treated as ticks
            _ => Event::Tick,
        }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl EventSource for CrosstermEventSource {
    fn next_event(&mut self) -> anyhow::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(Self::convert_event(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

/// Replays a fixed list of events, then ticks forever
#[derive(Debug, Default)]
pub struct ScriptedEventSource {
    events: VecDeque<Event>,
}

impl ScriptedEventSource {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Queue every character of `text` as a plain key press
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(c)
            };
            self.push(Event::key(code, KeyModifiers::NONE));
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for ScriptedEventSource {
    fn next_event(&mut self) -> anyhow::Result<Event> {
        Ok(self.events.pop_front().unwrap_or(Event::Tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_helper_builds_press() {
        let Event::Key(key) = Event::key(KeyCode::Char('k'), KeyModifiers::CONTROL) else {
            panic!("expected key event");
        };
        assert_eq!(key.kind, KeyEventKind::Press);
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_scripted_source_replays_then_ticks() {
        let mut source = ScriptedEventSource::new([Event::Resize(80, 24)]);
        source.type_text("hi");

        assert!(source.next_event().unwrap().is_resize());
        assert_eq!(
            source.next_event().unwrap(),
            Event::key(KeyCode::Char('h'), KeyModifiers::NONE)
        );
        assert_eq!(
            source.next_event().unwrap(),
            Event::key(KeyCode::Char('i'), KeyModifiers::NONE)
        );
        assert!(source.is_exhausted());
        assert_eq!(source.next_event().unwrap(), Event::Tick);
    }

    #[test]
    fn test_focus_events_become_ticks() {
        assert_eq!(
            CrosstermEventSource::convert_event(event::Event::FocusGained),
            Event::Tick
        );
    }
}
