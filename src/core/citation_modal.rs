//! Citation modal controller
//!
//! At most one citation is selected at a time; the latest selection wins.

use super::types::Citation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CitationModal {
    #[default]
    Closed,
    Open(Citation),
}

impl CitationModal {
    pub fn new() -> Self {
        Self::Closed
    }

    /// Open with `citation`, replacing any current selection
    pub fn open_with(&mut self, citation: Citation) {
        tracing::debug!(source = %citation.source, id = citation.id, "citation modal opened");
        *self = Self::Open(citation);
    }

    /// Close and discard the selection
    pub fn close(&mut self) {
        if self.is_open() {
            tracing::debug!("citation modal closed");
        }
        *self = Self::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn selection(&self) -> Option<&Citation> {
        match self {
            Self::Open(citation) => Some(citation),
            Self::Closed => None,
        }
    }
}
