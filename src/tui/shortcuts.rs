//! Keyboard shortcut dispatch
//!
//! A [`KeyboardHub`] fans every key press out to the listeners registered on
//! it. A [`ShortcutDispatcher`] is a declarative binding table mounted on the
//! hub for as long as its [`Subscription`] lives; dropping the subscription
//! removes the listener, so scoped tables (the citation modal, the focused
//! message list) come and go with the view that owns them.
//!
//! Every binding that matches a press fires, in table order, and each match
//! marks the press as handled so the focused text input ignores it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

/// A key press travelling through the hub
#[derive(Debug, Clone)]
pub struct KeyPress {
    pub event: KeyEvent,
    default_prevented: bool,
}

impl KeyPress {
    pub fn new(event: KeyEvent) -> Self {
        Self {
            event,
            default_prevented: false,
        }
    }

    /// Suppress the default handling (text entry) for this press
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// One entry of a binding table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut<A> {
    pub key: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub action: A,
}

impl<A> Shortcut<A> {
    /// Bind an unmodified key
    pub fn new(key: KeyCode, action: A) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
            action,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Exact modifier match; an uppercase character may carry SHIFT implicitly
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if event.code != self.key {
            return false;
        }
        let mods = event.modifiers;
        let shift = mods.contains(KeyModifiers::SHIFT);
        let implicit_shift = matches!(self.key, KeyCode::Char(c) if c.is_uppercase());

        mods.contains(KeyModifiers::CONTROL) == self.ctrl
            && mods.contains(KeyModifiers::ALT) == self.alt
            && (shift == self.shift || (implicit_shift && !self.shift))
    }

    /// Human readable chord, e.g. `Ctrl+Enter`
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.ctrl {
            label.push_str("Ctrl+");
        }
        if self.alt {
            label.push_str("Alt+");
        }
        if self.shift {
            label.push_str("Shift+");
        }
        label.push_str(&key_label(self.key, self.ctrl || self.alt));
        label
    }
}

/// Characters are shown uppercase only inside a modified chord
fn key_label(key: KeyCode, chord: bool) -> String {
    match key {
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab | KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if chord => c.to_ascii_uppercase().to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{:?}", other),
    }
}

/// Declarative binding table producing actions of type `A`
#[derive(Debug, Clone)]
pub struct ShortcutDispatcher<A> {
    bindings: Vec<Shortcut<A>>,
}

impl<A: Clone> ShortcutDispatcher<A> {
    pub fn new(bindings: Vec<Shortcut<A>>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[Shortcut<A>] {
        &self.bindings
    }

    /// Collect the actions of every binding matching `press`
    ///
    /// Auto-repeat fires like a fresh press; release events never match.
    pub fn dispatch(&self, press: &mut KeyPress) -> Vec<A> {
        if press.event.kind == KeyEventKind::Release {
            return Vec::new();
        }
        let mut fired = Vec::new();
        for binding in &self.bindings {
            if binding.matches(&press.event) {
                press.prevent_default();
                fired.push(binding.action.clone());
            }
        }
        fired
    }

    /// Register on `hub`, delivering fired actions to `tx` until the returned
    /// subscription is dropped
    pub fn mount(self, hub: &KeyboardHub, tx: mpsc::UnboundedSender<A>) -> Subscription
    where
        A: 'static,
    {
        hub.subscribe(move |press| {
            for action in self.dispatch(press) {
                if tx.send(action).is_err() {
                    tracing::debug!("shortcut receiver dropped");
                }
            }
        })
    }
}

type Listener = Box<dyn FnMut(&mut KeyPress)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out point for key presses
///
/// Listeners run in registration order and must not subscribe or
/// unsubscribe from inside the callback.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&mut KeyPress) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver a key event to every listener
    pub fn emit(&self, event: KeyEvent) -> KeyPress {
        let mut press = KeyPress::new(event);
        let mut inner = self.inner.borrow_mut();
        for (_, listener) in inner.listeners.iter_mut() {
            listener(&mut press);
        }
        press
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps a listener registered; dropping it deregisters
#[must_use = "dropping a subscription removes its listener immediately"]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
