use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::cache::CacheStore;
use crate::diagnostics::{Diagnostic, MESSAGE_SEPARATOR, MessageSink, Severity, surface};
use crate::errors::FetchError;
use crate::language_utils;
use crate::providers::easylaw::EasylawClient;
use crate::providers::{DocumentRequest, DocumentSource};
use crate::render::{self, RenderOptions};
use crate::scanner::{self, Invocation};

// @module: Page processing controller

/// Longest provider detail quoted in a diagnostic
const MAX_DETAIL_CHARS: usize = 500;

/// Facts about the current request supplied by the host
#[derive(Debug, Clone, Default)]
pub struct HostContext {
    /// Language tag of the site, e.g. `de-DE`
    pub site_language: String,
    /// Host name the page is served on
    pub domain: String,
    /// Request belongs to the administration backend
    pub is_admin: bool,
    /// Page is rendered for the search indexer
    pub is_indexing: bool,
    /// Page is rendered in an edit layout
    pub is_editing: bool,
    /// Surface diagnostics regardless of the configuration
    pub debug: bool,
}

impl HostContext {
    /// Create a context for a regular frontend request
    pub fn new(site_language: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            site_language: site_language.into(),
            domain: domain.into(),
            ..Default::default()
        }
    }

    /// Whether placeholders must be left untouched for this request
    pub fn should_skip(&self) -> bool {
        self.is_admin || self.is_indexing || self.is_editing
    }
}

/// Result of one page pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutput {
    /// Page text with placeholders replaced
    pub text: String,
    /// Style declarations to attach to the page head
    pub stylesheet: Option<String>,
    /// Diagnostics collected during the pass
    pub diagnostics: Vec<Diagnostic>,
}

impl PageOutput {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            stylesheet: None,
            diagnostics: Vec::new(),
        }
    }

    /// Page text with the stylesheet inlined before `</head>`, or prepended
    /// when the page has no head
    pub fn with_inline_stylesheet(&self) -> String {
        let Some(css) = &self.stylesheet else {
            return self.text.clone();
        };

        let style = format!("<style>{}</style>", css);
        match self.text.to_ascii_lowercase().find("</head>") {
            Some(index) => format!("{}{}{}", &self.text[..index], style, &self.text[index..]),
            None => format!("{}\n{}", style, self.text),
        }
    }
}

/// Why a document could not be produced from the provider
struct DocumentFailure {
    status_code: u16,
    detail: String,
}

impl From<FetchError> for DocumentFailure {
    fn from(error: FetchError) -> Self {
        Self {
            status_code: error.status_code(),
            detail: error.detail(),
        }
    }
}

/// Main controller embedding provider documents into pages
#[derive(Debug)]
pub struct Controller<S: DocumentSource = EasylawClient> {
    // @field: App configuration
    config: Config,
    // @field: Document source
    source: S,
    // @field: Rendered document cache
    cache: CacheStore,
}

impl Controller<EasylawClient> {
    // @method: Create a new controller talking to the configured endpoint
    pub fn with_config(config: Config) -> Self {
        let source = EasylawClient::new(config.endpoint.clone());
        Self::with_source(config, source)
    }
}

impl<S: DocumentSource> Controller<S> {
    /// Create a controller with a custom document source
    pub fn with_source(config: Config, source: S) -> Self {
        let cache = CacheStore::new(config.cache_root());
        Self { config, source, cache }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one page pass over `text`
    ///
    /// Every placeholder is replaced by its document, taken from a fresh cache
    /// entry or fetched from the provider. Failures fall back to whatever the
    /// cache holds. Only an invalid configuration aborts the pass; its
    /// diagnostic is always handed to `sink`, all others only in debug mode.
    pub async fn prepare_content(
        &self,
        context: &HostContext,
        text: &str,
        sink: &mut impl MessageSink,
    ) -> PageOutput {
        if context.should_skip() {
            return PageOutput::unchanged(text);
        }

        let invocations = scanner::scan(text);
        if invocations.is_empty() {
            return PageOutput::unchanged(text);
        }

        if let Err(e) = self.config.validate() {
            error!("Configuration validation failed: {}", e);
            sink.enqueue(Severity::Error, &e.to_string());
            let mut output = PageOutput::unchanged(text);
            output.diagnostics.push(Diagnostic::error(e.to_string()));
            return output;
        }

        let default_language =
            language_utils::default_document_language(&context.site_language, &self.config.language);
        let domain = self
            .config
            .domain
            .clone()
            .unwrap_or_else(|| context.domain.clone());

        debug!(
            "Processing {} placeholder(s) for {} (default language {})",
            invocations.len(),
            domain,
            default_language
        );

        let mut diagnostics = Vec::new();
        let mut page = String::with_capacity(text.len());
        let mut cursor = 0;

        for invocation in &invocations {
            let content = self
                .resolve(invocation, &default_language, &domain, &mut diagnostics)
                .await;

            page.push_str(&text[cursor..invocation.span.start]);
            page.push_str(&content);
            cursor = invocation.span.end;
        }
        page.push_str(&text[cursor..]);

        if (self.config.debug || context.debug) && !diagnostics.is_empty() {
            surface(&diagnostics, sink);
        }

        PageOutput {
            text: page,
            stylesheet: self.config.page_stylesheet().map(str::to_string),
            diagnostics,
        }
    }

    /// Produce the markup for one placeholder
    async fn resolve(
        &self,
        invocation: &Invocation,
        default_language: &str,
        domain: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        let language = self.resolve_language(invocation, default_language, diagnostics);

        if !invocation.has_valid_type() {
            warn!("Ignoring placeholder with invalid document type: {}", invocation.raw_match);
            diagnostics.push(Diagnostic::error(format!(
                "'{}' is not a valid document type.",
                invocation.document_type
            )));
            return String::new();
        }

        let path = self.cache.entry_path(&language, &invocation.document_type);
        if let Err(e) = self.cache.ensure_parent(&path) {
            warn!("{}", e);
        }

        if self.cache.is_fresh(&path, self.config.cache_ttl_secs()) {
            debug!("Cache hit for {} ({})", invocation.document_type, language);
            return self.cache.read(&path);
        }

        let request = DocumentRequest {
            document_type: invocation.document_type.clone(),
            license_key: self.config.license_key.trim().to_string(),
            language: language.clone(),
            domain: domain.to_string(),
            format: self.config.response_format,
        };

        match self.fetch_document(&request).await {
            Ok(markup) => {
                if let Err(e) = self.cache.write(&path, &markup) {
                    warn!("Failed to update cache: {}", e);
                    diagnostics.push(Diagnostic::warning(format!(
                        "The {} could not be cached: {}",
                        invocation.label(),
                        e
                    )));
                }
                info!("Loaded {} ({}) from the provider", invocation.document_type, language);
                markup
            }
            Err(failure) => {
                error!(
                    "Failed to load {} ({}), status {}: {}",
                    invocation.document_type,
                    language,
                    failure.status_code,
                    truncate_text(&failure.detail, 120)
                );
                diagnostics.push(Diagnostic::error(format!(
                    "The {} could not be loaded from the provider (status {}).{}{}",
                    invocation.label(),
                    failure.status_code,
                    MESSAGE_SEPARATOR,
                    truncate_text(&failure.detail, MAX_DETAIL_CHARS)
                )));
                self.cache.read(&path)
            }
        }
    }

    /// Language a placeholder is rendered in
    fn resolve_language(
        &self,
        invocation: &Invocation,
        default_language: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String {
        match &invocation.language_override {
            Some(language) if language_utils::is_supported(language) => language.clone(),
            Some(language) => {
                diagnostics.push(Diagnostic::warning(format!(
                    "The language {} is not available for the {}, using '{}' instead.",
                    language_utils::describe_language(language),
                    invocation.label(),
                    default_language
                )));
                default_language.to_string()
            }
            None => default_language.to_string(),
        }
    }

    /// Fetch a document and render it
    async fn fetch_document(&self, request: &DocumentRequest) -> Result<String, DocumentFailure> {
        let response = self
            .source
            .fetch(request)
            .await
            .and_then(|response| response.into_result())?;

        let options = RenderOptions {
            container: self.config.container().to_string(),
            heading_base: self.config.heading_base(),
        };

        render::render_response(request.format, &response.body, &options).map_err(|e| DocumentFailure {
            status_code: response.status_code,
            detail: e.to_string(),
        })
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
