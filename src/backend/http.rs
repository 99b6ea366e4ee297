//! HTTP answer backend
//!
//! Contract: `POST <endpoint>` with `{"question": "..."}`; a 2xx response
//! carries `{"answer": "...", "citations": [...]}`.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use super::AnswerBackend;
use crate::core::{Answer, BackendError};

#[derive(Serialize)]
struct AnswerRequest<'a> {
    question: &'a str,
}

/// Backend that forwards questions to a remote answer service
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid answer endpoint: {}", endpoint))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if err.is_decode() {
            BackendError::InvalidResponse(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// Reject payloads the UI cannot present faithfully
fn validate(answer: &Answer) -> Result<(), BackendError> {
    if answer.content.trim().is_empty() {
        return Err(BackendError::InvalidResponse("empty answer".to_string()));
    }
    let mut seen = HashSet::new();
    for citation in &answer.citations {
        if !seen.insert(citation.id) {
            return Err(BackendError::InvalidResponse(format!(
                "duplicate citation id {}",
                citation.id
            )));
        }
        Url::parse(&citation.link).map_err(|e| {
            BackendError::InvalidResponse(format!("citation {} link: {}", citation.id, e))
        })?;
    }
    Ok(())
}

#[async_trait]
impl AnswerBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn answer(&self, question: &str) -> Result<Answer, BackendError> {
        tracing::info!(endpoint = %self.endpoint, "requesting answer");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnswerRequest { question })
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "answer backend returned error status");
            return Err(BackendError::Status {
                code: status.as_u16(),
            });
        }

        let answer: Answer = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        validate(&answer)?;

        tracing::debug!(citations = answer.citations.len(), "answer received");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mount a single `POST /answer` responder and return the endpoint URL
    async fn answer_endpoint(server: &MockServer, response: ResponseTemplate) -> String {
        Mock::given(method("POST"))
            .and(path("/answer"))
            .respond_with(response)
            .mount(server)
            .await;
        format!("{}/answer", server.uri())
    }

    fn json_body(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
    }

    #[tokio::test]
    async fn test_request_posts_question_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/answer"))
            .and(body_json(json!({ "question": "Is there a rule?" })))
            .respond_with(json_body(json!({ "answer": "Yes.", "citations": [] })))
            .expect(1)
            .mount(&server)
            .await;
        let backend =
            HttpBackend::new(&format!("{}/answer", server.uri()), Duration::from_secs(5)).unwrap();

        let answer = backend.answer("Is there a rule?").await.unwrap();
        assert_eq!(answer.content, "Yes.");
        assert!(answer.citations.is_empty());
    }

    #[tokio::test]
    async fn test_answer_with_multiple_citations() {
        let server = MockServer::start().await;
        let url = answer_endpoint(
            &server,
            json_body(json!({
                "answer": "Yes.",
                "citations": [
                    {"id": 1, "text": "a", "source": "A v. B", "paragraph": "Para 1", "link": "https://example.com/a.pdf"},
                    {"id": 2, "text": "b", "source": "C v. D", "paragraph": "Para 9", "link": "https://example.com/c.pdf"}
                ]
            })),
        )
        .await;
        let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

        let answer = backend.answer("question").await.unwrap();
        assert_eq!(answer.content, "Yes.");
        assert_eq!(answer.citations.len(), 2);
        assert_eq!(answer.citations[1].source, "C v. D");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        let url = answer_endpoint(&server, ResponseTemplate::new(503)).await;
        let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

        let err = backend.answer("question").await.unwrap_err();
        assert_eq!(err, BackendError::Status { code: 503 });
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        let url = answer_endpoint(&server, json_body(json!({ "unexpected": true }))).await;
        let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

        let err = backend.answer("question").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_duplicate_citation_ids_rejected() {
        let server = MockServer::start().await;
        let url = answer_endpoint(
            &server,
            json_body(json!({
                "answer": "Yes.",
                "citations": [
                    {"id": 1, "text": "a", "source": "A", "paragraph": "1", "link": "https://example.com"},
                    {"id": 1, "text": "b", "source": "B", "paragraph": "2", "link": "https://example.com"}
                ]
            })),
        )
        .await;
        let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

        let err = backend.answer("question").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(ref m) if m.contains("duplicate")));
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        let url = answer_endpoint(
            &server,
            json_body(json!({ "answer": "late", "citations": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .await;
        let backend = HttpBackend::new(&url, Duration::from_millis(200)).unwrap();

        let err = backend.answer("question").await.unwrap_err();
        assert_eq!(err, BackendError::Timeout(Duration::from_millis(200)));
        assert!(err.user_message().contains("200ms"), "{}", err.user_message());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = HttpBackend::new(
            &format!("http://127.0.0.1:{}/answer", port),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = backend.answer("question").await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)), "{:?}", err);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(HttpBackend::new("not a url", Duration::from_secs(1)).is_err());
    }
}
