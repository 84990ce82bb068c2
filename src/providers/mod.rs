/*!
 * Document source implementations.
 *
 * This module contains the clients that retrieve legal documents:
 * - `easylaw`: HTTP client for the easyrechtssicher.de download API
 * - `mock`: Scripted in-process source for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::ResponseFormat;
use crate::errors::FetchError;

/// Parameters of one document download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    /// Document type, e.g. `dse`
    pub document_type: String,
    /// Provider license key
    pub license_key: String,
    /// Document language
    pub language: String,
    /// Domain the license is registered for
    pub domain: String,
    /// Requested response format
    pub format: ResponseFormat,
}

/// Raw provider response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response body
    pub body: String,
}

impl FetchResponse {
    /// Whether the status lies in the accepted band `[200, 400)`
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }

    /// Turn a response outside the accepted band into an error
    pub fn into_result(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::Status {
                status_code: self.status_code,
                body: self.body,
            })
        }
    }
}

/// Common trait for document sources
///
/// A source performs exactly one request per call: no retries and no
/// deduplication of identical requests.
#[async_trait]
pub trait DocumentSource: Send + Sync + Debug {
    /// Download a document
    ///
    /// # Returns
    /// * `Result<FetchResponse, FetchError>` - The raw response, or an error when
    ///   no response could be obtained. Status codes are not interpreted here.
    async fn fetch(&self, request: &DocumentRequest) -> Result<FetchResponse, FetchError>;
}

pub mod easylaw;
pub mod mock;
