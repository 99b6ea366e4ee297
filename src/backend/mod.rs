//! Answer backends
//!
//! A backend turns one question into an [`Answer`] or a [`BackendError`].
//! The conversation state machine treats every backend the same way, so the
//! simulated backend and the HTTP one are interchangeable.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{AssistantConfig, BackendKind};
use crate::core::{Answer, BackendError};

mod http;
mod simulated;

pub use http::HttpBackend;
pub use simulated::{sample_query, SimulatedBackend};

/// Trait for answer sources
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Get the backend name (for logs and the status bar)
    fn name(&self) -> &str;

    /// Answer a single question
    async fn answer(&self, question: &str) -> Result<Answer, BackendError>;
}

/// Build the backend selected by the assistant config
pub fn create_backend(config: &AssistantConfig) -> Result<Arc<dyn AnswerBackend>> {
    match config.backend {
        BackendKind::Simulated => Ok(Arc::new(SimulatedBackend::new(Duration::from_millis(
            config.response_delay_ms,
        )))),
        BackendKind::Http => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                anyhow::anyhow!("assistant.endpoint must be set to use the http backend")
            })?;
            let backend =
                HttpBackend::new(endpoint, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(backend))
        }
    }
}
