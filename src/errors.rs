/*!
 * Error types for the easylaw library.
 *
 * This module contains custom error types for the different stages of the
 * fetch/render/cache pipeline, using the thiserror crate for ergonomic
 * error definitions.
 */

use thiserror::Error;

/// Errors in the global configuration. These abort a whole page pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No license key has been configured
    #[error("No license key configured. Enter the license key of your easyrechtssicher.de account.")]
    MissingLicenseKey,

    /// The license key does not have the expected length
    #[error("The license key must be exactly {expected} characters long, found {actual}.")]
    InvalidLicenseKey {
        /// Required key length
        expected: usize,
        /// Length of the configured key
        actual: usize,
    },

    /// The configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Malformed(String),
}

/// Errors that can occur when fetching a document from the provider
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the response body could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The provider answered outside of the accepted status band
    #[error("Provider responded with status {status_code}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body sent along with the status
        body: String,
    },

    /// The request URL could not be built
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status attached to the failure, 0 when no response was received
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status_code, .. } => *status_code,
            _ => 0,
        }
    }

    /// Human readable detail for diagnostics
    pub fn detail(&self) -> String {
        match self {
            Self::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Errors that can occur while turning a provider response into markup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The HTML response has no `<body>` region
    #[error("No <body> element found in the provider response")]
    MissingBody,

    /// The extracted content is empty
    #[error("The provider response contains no content")]
    EmptyContent,

    /// The structured response could not be decoded
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// The provider flagged the request as failed
    #[error("Provider reported an error: {0}")]
    Provider(String),
}

/// Errors that can occur when accessing the cache directory
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying I/O failure
    #[error("Cache I/O error on {path}: {message}")]
    Io {
        /// Affected path
        path: String,
        /// Error message of the failed operation
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from the provider
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error while rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Error from the cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}
