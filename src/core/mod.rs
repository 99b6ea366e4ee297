//! Core domain modules
//!
//! State machines and types shared by the TUI and the headless `ask` command.
//! Nothing in here touches the terminal or the network.

pub mod citation_modal;
pub mod conversation;
pub mod errors;
pub mod types;

pub use citation_modal::CitationModal;
pub use conversation::{ConversationManager, ConversationState, PendingRequest, Transition};
pub use errors::{BackendError, ConversationError, HostError};
pub use types::{Answer, Citation, Message, MessageRole};
