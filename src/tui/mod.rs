//! Terminal UI for the chat session
//!
//! Built on ratatui and crossterm. The controller owns the loop; the state
//! machines live in [`crate::core`] and are shared with the headless `ask`
//! command.

pub mod app;
pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod keybindings;
pub mod osc52;
pub mod renderer;
pub mod shortcuts;
pub mod theme;
pub mod utils;
pub mod widgets;

pub use app::{AppState, FocusedComponent};
pub use config::AppConfig;
pub use controller::{AppEvent, ControllerOptions, TuiController};
pub use events::{CrosstermEventSource, Event, EventSource, ScriptedEventSource};
pub use host::{download_filename, HostActions, SystemHost};
pub use keybindings::Action;
pub use shortcuts::{KeyPress, KeyboardHub, Shortcut, ShortcutDispatcher, Subscription};
pub use theme::{Theme, ThemePreset};
