use anyhow::{Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the configuration supplied by the host: provider
/// credentials, cache policy and rendering options.

/// Required length of a provider license key
pub const LICENSE_KEY_LENGTH: usize = 25;

/// Lowest cache lifetime accepted when caching is enabled, in seconds
pub const MIN_CACHE_TTL_SECS: u64 = 3600;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// License key issued by the provider
    #[serde(default)]
    pub license_key: String,

    /// Default document language (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether rendered documents are cached on disk
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache lifetime in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Format requested from the provider
    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Element wrapping rendered documents and top level sections
    #[serde(default = "default_container_tag")]
    pub container_tag: String,

    /// Heading level of top level section titles
    #[serde(default = "default_heading_base_level")]
    pub heading_base_level: u8,

    /// Surface diagnostics to the host
    #[serde(default)]
    pub debug: bool,

    /// Attach the stylesheet to pages rendered from structured documents
    #[serde(default = "default_true")]
    pub use_stylesheet: bool,

    /// Style declarations attached when `use_stylesheet` is set
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,

    /// Base URL of the provider download API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Cache root directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Domain the license is registered for; overrides the host domain
    #[serde(default)]
    pub domain: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Response format requested from the provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Ready-made HTML document
    #[default]
    Html,
    /// Structured rule tree
    Json,
}

impl ResponseFormat {
    /// File extension used in the provider URL
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ResponseFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid response format: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "de".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_minutes() -> u64 {
    1440 // one day
}

fn default_container_tag() -> String {
    "section".to_string()
}

fn default_heading_base_level() -> u8 {
    1
}

fn default_endpoint() -> String {
    "https://easyrechtssicher.de/api/download".to_string()
}

fn default_stylesheet() -> String {
    ".easylaw .level1 { margin-bottom: 1.5em; }\n\
     .easylaw .level2 { margin-left: 1em; }\n\
     .easylaw .level3, .easylaw .level4 { margin-left: 1.5em; }"
        .to_string()
}

impl Config {
    /// Validate the configuration for a page pass
    ///
    /// Only the license key is mandatory; every other option has a usable default.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let key = self.license_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingLicenseKey);
        }

        let actual = key.chars().count();
        if actual != LICENSE_KEY_LENGTH {
            return Err(ConfigError::InvalidLicenseKey {
                expected: LICENSE_KEY_LENGTH,
                actual,
            });
        }

        Ok(())
    }

    /// Effective cache lifetime in seconds
    ///
    /// Disabled caching yields 0, otherwise the configured lifetime is raised
    /// to at least [`MIN_CACHE_TTL_SECS`].
    pub fn cache_ttl_secs(&self) -> u64 {
        if !self.cache_enabled {
            return 0;
        }

        self.cache_ttl_minutes
            .saturating_mul(60)
            .max(MIN_CACHE_TTL_SECS)
    }

    /// Container element name, falling back to `section` for invalid tag names
    pub fn container(&self) -> &str {
        let tag = self.container_tag.trim();
        let valid = tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric());

        if valid {
            tag
        } else {
            warn!("Invalid container tag '{}', using 'section'", self.container_tag);
            "section"
        }
    }

    /// Heading base level clamped to the range of HTML headings
    pub fn heading_base(&self) -> u8 {
        self.heading_base_level.clamp(1, 6)
    }

    /// Cache root directory
    pub fn cache_root(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("easylaw"),
        }
    }

    /// Stylesheet to attach to a page, if any
    pub fn page_stylesheet(&self) -> Option<&str> {
        let css = self.stylesheet.trim();
        if self.response_format == ResponseFormat::Json && self.use_stylesheet && !css.is_empty() {
            Some(css)
        } else {
            None
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            license_key: String::new(),
            language: default_language(),
            cache_enabled: true,
            cache_ttl_minutes: default_cache_ttl_minutes(),
            response_format: ResponseFormat::default(),
            container_tag: default_container_tag(),
            heading_base_level: default_heading_base_level(),
            debug: false,
            use_stylesheet: true,
            stylesheet: default_stylesheet(),
            endpoint: default_endpoint(),
            cache_dir: None,
            domain: None,
            log_level: LogLevel::default(),
        }
    }
}
