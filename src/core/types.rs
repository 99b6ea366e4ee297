//! Conversation data types
//!
//! Messages and citations are immutable once created. The conversation owns
//! its messages; citations are shared by value with the modal and host actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A quoted excerpt of case text with its source and locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Unique within the owning message
    pub id: u32,
    /// Quoted excerpt
    pub text: String,
    /// Case name, e.g. "Dani Devi v. Pritam Singh (P&H)"
    pub source: String,
    /// Paragraph locator, e.g. "Para 7"
    pub paragraph: String,
    /// Link to the original document
    pub link: String,
    /// Document text leading into the excerpt, for the preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preceding: Option<String>,
    /// Document text following the excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<String>,
}

impl Citation {
    /// "Source (Paragraph)" as shown under the excerpt
    pub fn reference(&self) -> String {
        format!("{} ({})", self.source, self.paragraph)
    }
}

/// A single conversation entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub citations: Vec<Citation>,
    pub timestamp: DateTime<Utc>,
    /// Assistant turn that reports a failed request instead of an answer
    pub failed: bool,
}

impl Message {
    fn new(role: MessageRole, content: String, citations: Vec<Citation>, failed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            citations,
            timestamp: Utc::now(),
            failed,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), Vec::new(), false)
    }

    pub fn assistant(answer: Answer) -> Self {
        Self::new(MessageRole::Assistant, answer.content, answer.citations, false)
    }

    pub fn assistant_error(description: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, description.into(), Vec::new(), true)
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// What an answer backend returns for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer")]
    pub content: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl Answer {
    pub fn new(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            content: content.into(),
            citations,
        }
    }
}
