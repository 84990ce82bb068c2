/*!
 * Placeholder scanning for page text.
 *
 * Pages embed documents with `{jteasylaw <type>[, <language>]}`. A placeholder
 * may sit directly inside a single element (`<p>{jteasylaw dse}</p>`); the
 * element is then replaced together with the placeholder. Placeholders wrapped
 * in `<code>` or `<pre>` are examples, not invocations, and are skipped.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Keyword opening a placeholder
pub const TAG_KEYWORD: &str = "jteasylaw";

/// Wrapper elements whose placeholders are shown verbatim
const VERBATIM_TAGS: &[&str] = &["code", "pre"];

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?is)(?:<(\w+)[^>]*>)?\{{{}\s(.*?)\}}(?:</(\w+)>)?", TAG_KEYWORD)).unwrap()
});

/// One placeholder found in page text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Exact text to be replaced
    pub raw_match: String,
    /// Byte range of `raw_match` in the scanned text
    pub span: Range<usize>,
    /// Requested document type, lowercase
    pub document_type: String,
    /// Requested language, lowercase
    pub language_override: Option<String>,
}

impl Invocation {
    /// Name of the requested document for messages
    pub fn label(&self) -> &str {
        document_label(&self.document_type)
    }

    /// Whether the document type can safely be used as a file name
    pub fn has_valid_type(&self) -> bool {
        !self.document_type.is_empty()
            && self
                .document_type
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    }
}

/// Human readable name of a document type
pub fn document_label(document_type: &str) -> &str {
    match document_type {
        "dse" => "privacy policy",
        "imp" => "imprint",
        other => other,
    }
}

/// Find all placeholders in `text`, in source order
pub fn scan(text: &str) -> Vec<Invocation> {
    let mut invocations = Vec::new();

    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let opening = caps.get(1).map(|m| m.as_str());

        if opening.is_some_and(is_verbatim) {
            continue;
        }

        // The wrapper belongs to the match only when it is closed by the same element
        let wrapped = match (opening, caps.get(3)) {
            (Some(open), Some(close)) => open.eq_ignore_ascii_case(close.as_str()),
            _ => false,
        };

        let Some(args) = caps.get(2) else { continue };

        let span = if wrapped {
            whole.range()
        } else {
            let start = text[..args.start()].rfind('{').unwrap_or(whole.start());
            let end = caps.get(3).map_or(whole.end(), |close| close.start() - "</".len());
            start..end
        };

        let (document_type, language_override) = parse_arguments(args.as_str());

        invocations.push(Invocation {
            raw_match: text[span.clone()].to_string(),
            span,
            document_type,
            language_override,
        });
    }

    invocations
}

/// Split the placeholder arguments into document type and language override
pub fn parse_arguments(args: &str) -> (String, Option<String>) {
    let mut fields = args.split(',');

    let document_type = fields
        .next()
        .map(|field| field.trim().to_lowercase())
        .unwrap_or_default();

    let language_override = fields
        .next()
        .map(|field| field.trim().to_lowercase())
        .filter(|field| !field.is_empty());

    (document_type, language_override)
}

fn is_verbatim(tag: &str) -> bool {
    VERBATIM_TAGS.iter().any(|verbatim| verbatim.eq_ignore_ascii_case(tag))
}
