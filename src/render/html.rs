use once_cell::sync::Lazy;
use regex::Regex;

use super::wrap_document;
use crate::errors::RenderError;

/// First `<body>` region of a document
static BODY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<body[^>]*>(.*?)</body>").unwrap()
});

/// Extract the body of an HTML document and wrap it in `container`
pub fn render_html(raw_html: &str, container: &str) -> Result<String, RenderError> {
    let body = BODY_REGEX
        .captures(raw_html)
        .and_then(|caps| caps.get(1))
        .ok_or(RenderError::MissingBody)?;

    if body.as_str().trim().is_empty() {
        return Err(RenderError::EmptyContent);
    }

    Ok(wrap_document(container, body.as_str()))
}
