//! Domain error types
//!
//! These errors represent business logic failures, distinct from infrastructure errors.
//! Using thiserror for ergonomic error handling with proper Display implementations.

use std::time::Duration;

use thiserror::Error;

/// Errors from the conversation state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// Submitted text was empty after trimming
    #[error("Nothing to send")]
    BlankInput,

    /// A response is still pending
    #[error("A response is already pending")]
    AlreadyPending,

    /// A completion arrived for a request that is no longer pending
    #[error("Response for request {0} is no longer expected")]
    StaleResponse(u64),
}

/// Errors from an answer backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("Request timed out after {}", format_timeout(.0))]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned HTTP {code}")]
    Status { code: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Whole seconds print as `30s`, anything finer as `500ms`
fn format_timeout(timeout: &Duration) -> String {
    if timeout.subsec_millis() == 0 && timeout.as_secs() > 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

impl BackendError {
    /// Text shown in the failed assistant turn
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(_) => format!("{}. Please try again.", self),
            _ => format!("Sorry, the answer could not be retrieved. {}", self),
        }
    }
}

/// Errors from host integrations (clipboard, browser, downloads)
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Could not open link: {0}")]
    OpenLink(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
