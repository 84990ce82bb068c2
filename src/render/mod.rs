/*!
 * Conversion of provider responses into page markup.
 *
 * - `html`: extracts the body of a ready-made HTML document
 * - `structured`: renders the rule tree of a structured document
 *
 * Both produce a fragment wrapped in the configured container element
 * carrying the [`CONTAINER_CLASS`] class.
 */

use crate::app_config::ResponseFormat;
use crate::errors::RenderError;

pub mod html;
pub mod structured;

pub use self::html::render_html;
pub use self::structured::{ProviderPayload, Rule, render_rules, render_structured};

/// Class attached to the outer container of every rendered document
pub const CONTAINER_CLASS: &str = "easylaw";

/// Options shared by both renderers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Container element name
    pub container: String,
    /// Heading level of top level sections
    pub heading_base: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            container: "section".to_string(),
            heading_base: 1,
        }
    }
}

/// Render a response body in the given format
pub fn render_response(
    format: ResponseFormat,
    body: &str,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    match format {
        ResponseFormat::Html => render_html(body, &options.container),
        ResponseFormat::Json => render_structured(body, options),
    }
}

/// Wrap a fragment in the outer document container
fn wrap_document(container: &str, inner: &str) -> String {
    format!(
        "<{tag} class=\"{class}\">{inner}</{tag}>",
        tag = container,
        class = CONTAINER_CLASS,
        inner = inner
    )
}
