use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use url::Url;

use crate::errors::FetchError;
use crate::providers::{DocumentRequest, DocumentSource, FetchResponse};

/// Client for the easyrechtssicher.de download API
#[derive(Debug, Clone)]
pub struct EasylawClient {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the download API
    endpoint: String,
}

impl EasylawClient {
    /// Create a new client for the given download endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("easylaw/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Base URL of the download API
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the download URL for a request
    ///
    /// `<endpoint>/<type>/<key>/<language>/<domain>.<format>`, every segment
    /// percent-encoded.
    pub fn document_url(&self, request: &DocumentRequest) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;

        let file_name = format!("{}.{}", request.domain, request.format.extension());

        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{} cannot be a base URL", self.endpoint)))?
            .pop_if_empty()
            .extend([
                request.document_type.as_str(),
                request.license_key.as_str(),
                request.language.as_str(),
                file_name.as_str(),
            ]);

        Ok(url)
    }
}

#[async_trait]
impl DocumentSource for EasylawClient {
    async fn fetch(&self, request: &DocumentRequest) -> Result<FetchResponse, FetchError> {
        let url = self.document_url(request)?;
        debug!(
            "Requesting {} ({}) for {} as {}",
            request.document_type, request.language, request.domain, request.format
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Failed to send request to provider: {}", e);
            FetchError::RequestFailed(redact(&e.to_string(), &request.license_key))
        })?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        Ok(FetchResponse { status_code, body })
    }
}

/// Remove the license key from messages that may echo the request URL
fn redact(message: &str, license_key: &str) -> String {
    if license_key.is_empty() {
        message.to_string()
    } else {
        message.replace(license_key, "***")
    }
}
