/*!
 * Rendering of structured documents.
 *
 * The provider describes a document as a tree of rules. Each rule becomes a
 * container element with an optional heading and paragraph, followed by its
 * children. Rules deeper than level 2 use `div` so that sectioning elements
 * are not nested arbitrarily deep.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use super::{RenderOptions, wrap_document};
use crate::errors::RenderError;

/// Deepest rule level rendered with the configured container element
const SECTION_DEPTH: i64 = 2;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\n\r|\n|\r").unwrap());

/// Top level structured response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderPayload {
    /// Success flag; falsy values mark a provider side error
    pub ok: OkFlag,
    /// Error detail sent along with a failed request
    #[serde(rename = "errMsg", default)]
    pub err_msg: Option<String>,
    /// Document rules
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rules: Vec<Rule>,
}

/// Success flag as sent by the provider (`1`, `true`, `"1"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OkFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OkFlag {
    /// Whether the flag signals success
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Text(value) => {
                let value = value.trim();
                !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
            }
        }
    }
}

/// One node of a structured document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    /// Identifier, used as element id and class
    pub name: String,
    /// Nesting level, 1 for top level rules
    #[serde(deserialize_with = "integer_or_string")]
    pub level: i64,
    /// Section title
    #[serde(default)]
    pub header: Option<String>,
    /// Section text
    #[serde(default)]
    pub content: Option<String>,
    /// Nested rules
    #[serde(rename = "rules", default, deserialize_with = "null_as_empty")]
    pub children: Vec<Rule>,
}

impl Rule {
    /// Element used for this rule
    pub fn container_tag<'a>(&self, container: &'a str) -> &'a str {
        if self.level > SECTION_DEPTH { "div" } else { container }
    }

    /// Heading level of this rule below a parent heading level
    pub fn heading_level(&self, base: i64) -> i64 {
        base.saturating_add(self.level).saturating_sub(2).clamp(1, 6)
    }

    /// Depth used in the `level<N>` class
    pub fn depth_label(&self) -> i64 {
        self.level.saturating_sub(1).max(1)
    }
}

/// Decode and render a structured response
pub fn render_structured(body: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let payload = decode_payload(body)?;

    if !payload.ok.is_ok() {
        let message = payload
            .err_msg
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "unknown provider error".to_string());
        return Err(RenderError::Provider(message));
    }

    if payload.rules.is_empty() {
        return Err(RenderError::EmptyContent);
    }

    let inner = render_rules(&payload.rules, i64::from(options.heading_base), &options.container);
    Ok(wrap_document(&options.container, &inner))
}

/// Decode a structured response body
pub fn decode_payload(body: &str) -> Result<ProviderPayload, RenderError> {
    serde_json::from_str(body).map_err(|e| RenderError::Decode(e.to_string()))
}

/// Render rules and their children
///
/// `heading_base` is the heading level computed for the parent; top level
/// rules receive the configured base level.
pub fn render_rules(rules: &[Rule], heading_base: i64, container: &str) -> String {
    let mut html = String::new();

    for rule in rules {
        let tag = rule.container_tag(container);
        let heading = rule.heading_level(heading_base);
        let name = escape_text(&rule.name);

        html.push_str(&format!(
            "<{tag} id=\"{name}\" class=\"{name} level{depth}\">",
            tag = tag,
            name = name,
            depth = rule.depth_label()
        ));

        if let Some(header) = rule.header.as_deref().filter(|header| !header.is_empty()) {
            html.push_str(&format!("<h{0}>{1}</h{0}>", heading, escape_text(&strip_tags(header))));
        }

        if let Some(content) = rule.content.as_deref().filter(|content| !content.is_empty()) {
            html.push_str(&format!("<p>{}</p>", nl2br(content)));
        }

        if !rule.children.is_empty() {
            html.push_str(&render_rules(&rule.children, heading, container));
        }

        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Remove all markup tags from `text`
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Insert `<br />` before every line break
pub fn nl2br(text: &str) -> String {
    LINE_BREAK_REGEX.replace_all(text, "<br />$0").into_owned()
}

/// Escape text for use in element content and attribute values
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn integer_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Int(i64),
        Text(String),
    }

    match Level::deserialize(deserializer)? {
        Level::Int(value) => Ok(value),
        Level::Text(value) => value
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid rule level: {}", value))),
    }
}
