//! TUI widgets
//!
//! Each widget borrows the state it draws and renders into a buffer area.

pub mod citation_modal;
pub mod header;
pub mod input;
pub mod message_area;
pub mod status_bar;
pub mod welcome;

pub use citation_modal::CitationModalView;
pub use header::Header;
pub use input::InputWidget;
pub use message_area::MessageArea;
pub use status_bar::StatusBar;
pub use welcome::Welcome;
