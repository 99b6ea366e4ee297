//! Conversation Manager - Message history and request state
//!
//! Handles:
//! - Append-only message history (cleared only as a whole)
//! - Request state machine (Empty -> AwaitingResponse -> Idle)
//! - Matching backend completions to the request that is pending

use super::errors::{BackendError, ConversationError};
use super::types::{Answer, Message};

/// Conversation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No messages
    Empty,
    /// A user message was appended and its response is pending
    AwaitingResponse { request_id: u64 },
    /// No response pending, at least one message exists
    Idle,
}

impl ConversationState {
    /// Get a string representation for debugging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::AwaitingResponse { .. } => "AwaitingResponse",
            Self::Idle => "Idle",
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingResponse { .. })
    }
}

/// A state change made by one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ConversationState,
    pub to: ConversationState,
}

impl Transition {
    /// Transitions into Idle or Empty move the message view to the latest entry
    pub fn scrolls_to_latest(&self) -> bool {
        matches!(self.to, ConversationState::Idle | ConversationState::Empty)
    }
}

/// A question handed to the answer backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: u64,
    pub question: String,
}

/// Owns the message history and the request state
#[derive(Debug)]
pub struct ConversationManager {
    messages: Vec<Message>,
    state: ConversationState,
    next_request_id: u64,
}

impl Default for ConversationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationManager {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            state: ConversationState::Empty,
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a response is pending (the loading guard)
    pub fn is_loading(&self) -> bool {
        self.state.is_awaiting()
    }

    /// Append a user message and start waiting for its response
    ///
    /// Blank text and submissions while a response is pending are rejected
    /// without touching the history or the state.
    pub fn submit(
        &mut self,
        text: &str,
    ) -> Result<(PendingRequest, Transition), ConversationError> {
        if text.trim().is_empty() {
            return Err(ConversationError::BlankInput);
        }
        if self.state.is_awaiting() {
            return Err(ConversationError::AlreadyPending);
        }

        let id = self.next_request_id;
        self.next_request_id += 1;

        self.messages.push(Message::user(text));
        let transition = self.transition(ConversationState::AwaitingResponse { request_id: id });

        Ok((
            PendingRequest {
                id,
                question: text.to_string(),
            },
            transition,
        ))
    }

    /// Finish the pending request with the backend's result
    ///
    /// A failed result still produces exactly one assistant message, marked
    /// as failed, so the turn is visible in the history.
    pub fn complete(
        &mut self,
        request_id: u64,
        result: Result<Answer, BackendError>,
    ) -> Result<Transition, ConversationError> {
        match self.state {
            ConversationState::AwaitingResponse { request_id: pending } if pending == request_id => {}
            _ => return Err(ConversationError::StaleResponse(request_id)),
        }

        let message = match result {
            Ok(answer) => Message::assistant(answer),
            Err(e) => {
                tracing::warn!(request_id, error = %e, "answer request failed");
                Message::assistant_error(e.user_message())
            }
        };
        self.messages.push(message);

        Ok(self.transition(ConversationState::Idle))
    }

    /// Drop the whole history, whatever the current state
    pub fn clear(&mut self) -> Transition {
        self.messages.clear();
        self.transition(ConversationState::Empty)
    }

    /// Last message, if any
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    fn transition(&mut self, to: ConversationState) -> Transition {
        let from = self.state;
        self.state = to;
        tracing::debug!(from = from.as_str(), to = to.as_str(), "conversation transition");
        Transition { from, to }
    }
}
