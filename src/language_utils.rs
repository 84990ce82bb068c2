use anyhow::{Result, anyhow};
use isolang::Language;
use log::warn;

/// Language utilities for the document languages offered by the provider
///
/// The provider publishes its documents in a fixed set of ISO 639-1 languages.
/// These helpers normalize host language tags and decide which language a
/// document is requested in.
pub const SUPPORTED_LANGUAGES: &[&str] = &["de", "en"];

/// Normalize a language code or host language tag ("de-DE", "EN_gb") to a
/// lowercase two-letter code
pub fn normalize_language_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .take(2)
        .collect::<String>()
        .to_lowercase()
}

/// Check whether the provider offers documents in this language
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Language used when neither the site nor the configuration names a supported one
pub const FALLBACK_LANGUAGE: &str = "de";

/// Resolve the default document language for a page
///
/// The site language wins when the provider supports it, then the configured
/// default language. Anything else resolves to [`FALLBACK_LANGUAGE`], so the
/// result is always one of [`SUPPORTED_LANGUAGES`].
pub fn default_document_language(site_language: &str, configured: &str) -> String {
    let site = normalize_language_tag(site_language);
    if is_supported(&site) {
        return site;
    }

    let configured_code = normalize_language_tag(configured);
    if is_supported(&configured_code) {
        configured_code
    } else {
        warn!(
            "Configured language '{}' is not offered by the provider, using '{}'",
            configured, FALLBACK_LANGUAGE
        );
        FALLBACK_LANGUAGE.to_string()
    }
}

/// Get the English name of an ISO 639-1 language code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_name().to_string());
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Describe a language code for user-facing messages, e.g. `fr (French)`
pub fn describe_language(code: &str) -> String {
    match get_language_name(code) {
        Ok(name) => format!("{} ({})", code, name),
        Err(_) => code.to_string(),
    }
}
