/*!
 * Mock document source for testing.
 *
 * This module provides a source that answers from a script instead of the network:
 * - `MockSource::html(..)` / `MockSource::json(..)` - Always succeeds with the given body
 * - `MockSource::status(..)` - Answers with a fixed status code
 * - `MockSource::unreachable()` - Never produces a response
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::FetchError;
use crate::providers::{DocumentRequest, DocumentSource, FetchResponse};

/// Behavior mode for the mock source
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Answer with the given status and body
    Respond { status_code: u16, body: String },
    /// Fail before any response is received
    Unreachable,
}

/// Mock source recording every request it receives
#[derive(Debug, Clone)]
pub struct MockSource {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of fetches performed
    request_count: Arc<AtomicUsize>,
    /// Requests received, in order
    requests: Arc<Mutex<Vec<DocumentRequest>>>,
}

impl MockSource {
    /// Create a new mock source with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Source answering 200 with an HTML document
    pub fn html(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// Source answering 200 with a structured document
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    /// Source answering with a fixed status code
    pub fn status(status_code: u16, body: impl Into<String>) -> Self {
        Self::new(MockBehavior::Respond {
            status_code,
            body: body.into(),
        })
    }

    /// Source failing without a response
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Wrap a body in a minimal HTML page
    pub fn html_page(body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>Document</title></head>\n<body class=\"doc\">{}</body></html>",
            body
        )
    }

    /// Number of fetches performed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of all requests received so far
    pub fn requests(&self) -> Vec<DocumentRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch(&self, request: &DocumentRequest) -> Result<FetchResponse, FetchError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Respond { status_code, body } => Ok(FetchResponse {
                status_code: *status_code,
                body: body.clone(),
            }),
            MockBehavior::Unreachable => Err(FetchError::RequestFailed(
                "Mock source is unreachable".to_string(),
            )),
        }
    }
}
