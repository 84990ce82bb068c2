/*!
 * # easylaw - legal texts for content pages
 *
 * A Rust library that embeds legal documents (privacy policy, imprint) from
 * easyrechtssicher.de into page text.
 *
 * ## Features
 *
 * - Find `{jteasylaw <type>[, <language>]}` placeholders in page text
 * - Download documents as HTML or as a structured rule tree
 * - Render structured documents into nested sections
 * - Cache rendered documents on disk with a configurable lifetime
 * - Fall back to the last cached copy when the provider is unavailable
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `scanner`: Placeholder detection and argument parsing
 * - `cache`: File cache for rendered documents
 * - `providers`: Document sources:
 *   - `providers::easylaw`: Provider HTTP client
 *   - `providers::mock`: Scripted source for tests
 * - `render`: Conversion of provider responses into markup:
 *   - `render::html`: Body extraction for HTML responses
 *   - `render::structured`: Rule tree rendering for JSON responses
 * - `app_controller`: Page pass orchestration
 * - `diagnostics`: Messages for the site owner
 * - `app_config`: Configuration management
 * - `language_utils`: Document language helpers
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod cache;
pub mod diagnostics;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod render;
pub mod scanner;

// Re-export main types for easier usage
pub use app_config::{Config, ResponseFormat};
pub use app_controller::{Controller, HostContext, PageOutput};
pub use cache::CacheStore;
pub use diagnostics::{Diagnostic, HostMessage, MessageSink, Severity};
pub use errors::{AppError, CacheError, ConfigError, FetchError, RenderError};
pub use scanner::{Invocation, scan};
