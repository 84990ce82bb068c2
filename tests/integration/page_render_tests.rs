/*!
 * Integration tests for rendering pages with embedded documents
 */

use anyhow::Result;

use easylaw::app_config::Config;
use easylaw::diagnostics::{CONFIGURATION_HINT, HostMessage, Severity};
use easylaw::file_utils::FileManager;
use easylaw::providers::mock::MockSource;
use crate::common;

/// A page without a license key is left untouched and reports one error
#[tokio::test]
async fn test_prepareContent_withEmptyLicenseKey_shouldReportConfigError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config {
        license_key: String::new(),
        ..common::licensed_config(temp_dir.path())
    };
    let source = MockSource::html(MockSource::html_page("<p>x</p>"));
    let controller = common::mock_controller(config, &source);
    let text = "<p>{jteasylaw dse}</p>";

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller.prepare_content(&common::frontend_context(), text, &mut sink).await;

    assert_eq!(output.text, text);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Error);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].severity, Severity::Error);
    assert_eq!(source.request_count(), 0);
    Ok(())
}

/// A fresh cache entry is served without contacting the provider
#[tokio::test]
async fn test_prepareContent_withFreshCache_shouldNotFetch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>new</p>"));
    let controller = common::mock_controller(config, &source);

    let path = controller.cache().entry_path("de", "dse");
    controller.cache().write(&path, "<section class=\"easylaw\">cached</section>")?;

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "<p>{jteasylaw dse}</p>", &mut sink)
        .await;

    assert_eq!(output.text, "<section class=\"easylaw\">cached</section>");
    assert!(output.diagnostics.is_empty());
    assert_eq!(source.request_count(), 0);
    Ok(())
}

/// A failed fetch without a cache entry leaves an empty spot and an error
#[tokio::test]
async fn test_prepareContent_withUnavailableProvider_shouldSubstituteEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::status(503, "Service Unavailable");
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "A {jteasylaw dse} B", &mut sink)
        .await;

    assert_eq!(output.text, "A  B");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Error);
    assert_eq!(
        output.diagnostics[0].text,
        "The privacy policy could not be loaded from the provider (status 503).<br />Service Unavailable"
    );
    assert!(!FileManager::file_exists(controller.cache().entry_path("de", "dse")));
    assert!(sink.is_empty());
    Ok(())
}

/// A structured document is rendered, substituted and cached
#[tokio::test]
async fn test_prepareContent_withStructuredDocument_shouldRenderAndCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::structured_config(temp_dir.path());
    let source = MockSource::json(common::single_rule_payload());
    let controller = common::mock_controller(config, &source);
    let expected =
        "<section class=\"easylaw\"><section id=\"a\" class=\"a level1\"><h1>Title</h1><p>Body</p></section></section>";

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "<div>{jteasylaw dse}</div>", &mut sink)
        .await;

    assert_eq!(output.text, expected);
    assert!(output.diagnostics.is_empty());
    assert!(output.stylesheet.is_some());
    assert_eq!(
        FileManager::read_to_string(controller.cache().entry_path("de", "dse"))?,
        expected
    );

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document_type, "dse");
    assert_eq!(requests[0].language, "de");
    assert_eq!(requests[0].domain, "example.org");
    assert_eq!(requests[0].license_key, common::TEST_LICENSE_KEY);
    Ok(())
}

/// HTML documents keep only their body and get no stylesheet
#[tokio::test]
async fn test_prepareContent_withHtmlDocument_shouldEmbedBody() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<h2>Impressum</h2>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "Intro\n<p>{jteasylaw imp}</p>\nEnd", &mut sink)
        .await;

    assert_eq!(output.text, "Intro\n<section class=\"easylaw\"><h2>Impressum</h2></section>\nEnd");
    assert!(output.stylesheet.is_none());
    assert_eq!(output.with_inline_stylesheet(), output.text);
    Ok(())
}

/// An unsupported language override falls back to the page language
#[tokio::test]
async fn test_prepareContent_withUnsupportedLanguage_shouldWarnAndFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>Datenschutz</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "{jteasylaw dse, fr}", &mut sink)
        .await;

    assert_eq!(output.text, "<section class=\"easylaw\"><p>Datenschutz</p></section>");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Warning);
    assert!(output.diagnostics[0].text.contains("fr (French)"));
    assert_eq!(source.requests()[0].language, "de");
    Ok(())
}

/// A supported override applies to its own placeholder only
#[tokio::test]
async fn test_prepareContent_withLanguageOverride_shouldNotLeakToOtherPlaceholders() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    controller
        .prepare_content(
            &common::frontend_context(),
            "{jteasylaw dse, en} {jteasylaw imp}",
            &mut sink,
        )
        .await;

    let languages: Vec<_> = source.requests().into_iter().map(|r| r.language).collect();
    assert_eq!(languages, vec!["en".to_string(), "de".to_string()]);
    Ok(())
}

/// Identical placeholders on one page fetch once
#[tokio::test]
async fn test_prepareContent_withRepeatedPlaceholder_shouldReuseCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "{jteasylaw dse}|{jteasylaw dse}", &mut sink)
        .await;

    assert_eq!(source.request_count(), 1);
    assert_eq!(
        output.text,
        "<section class=\"easylaw\"><p>doc</p></section>|<section class=\"easylaw\"><p>doc</p></section>"
    );
    Ok(())
}

/// Backend, indexer and edit requests are passed through
#[tokio::test]
async fn test_prepareContent_withSkipFlags_shouldLeavePageUntouched() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::default();
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(Config { cache_dir: Some(temp_dir.path().to_path_buf()), ..config }, &source);
    let text = "<p>{jteasylaw dse}</p>";

    for flag in 0..3 {
        let mut context = common::frontend_context();
        match flag {
            0 => context.is_admin = true,
            1 => context.is_indexing = true,
            _ => context.is_editing = true,
        }

        let mut sink: Vec<HostMessage> = Vec::new();
        let output = controller.prepare_content(&context, text, &mut sink).await;

        assert_eq!(output.text, text);
        assert!(output.diagnostics.is_empty());
        assert!(sink.is_empty());
    }

    assert_eq!(source.request_count(), 0);
    Ok(())
}

/// Placeholders shown as code examples stay in the page
#[tokio::test]
async fn test_prepareContent_withCodeExample_shouldKeepExample() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(
            &common::frontend_context(),
            "Write <code>{jteasylaw dse}</code>:\n<p>{jteasylaw dse}</p>",
            &mut sink,
        )
        .await;

    assert_eq!(
        output.text,
        "Write <code>{jteasylaw dse}</code>:\n<section class=\"easylaw\"><p>doc</p></section>"
    );
    assert_eq!(source.request_count(), 1);
    Ok(())
}

/// Diagnostics reach the host only in debug mode
#[tokio::test]
async fn test_prepareContent_withDebugContext_shouldSurfaceGroupedMessages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::unreachable();
    let controller = common::mock_controller(config, &source);
    let text = "{jteasylaw dse, fr} {jteasylaw imp}";

    let mut quiet: Vec<HostMessage> = Vec::new();
    let output = controller.prepare_content(&common::frontend_context(), text, &mut quiet).await;
    assert!(quiet.is_empty());
    assert_eq!(output.diagnostics.len(), 3);

    let mut context = common::frontend_context();
    context.debug = true;
    let mut sink: Vec<HostMessage> = Vec::new();
    controller.prepare_content(&context, text, &mut sink).await;

    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].severity, Severity::Warning);
    assert_eq!(sink[1].severity, Severity::Error);
    assert!(sink[1].message.contains("(status 0)"));
    assert!(sink[1].message.ends_with(CONFIGURATION_HINT));
    Ok(())
}

/// The configured domain replaces the host domain
#[tokio::test]
async fn test_prepareContent_withConfiguredDomain_shouldRequestConfiguredDomain() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config {
        domain: Some("registered.example".to_string()),
        ..common::licensed_config(temp_dir.path())
    };
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    controller
        .prepare_content(&common::frontend_context(), "{jteasylaw dse}", &mut sink)
        .await;

    assert_eq!(source.requests()[0].domain, "registered.example");
    Ok(())
}

/// Document types that are not safe file names are rejected
#[tokio::test]
async fn test_prepareContent_withInvalidDocumentType_shouldNotFetch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::licensed_config(temp_dir.path());
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "[{jteasylaw ../secret}]", &mut sink)
        .await;

    assert_eq!(output.text, "[]");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].severity, Severity::Error);
    assert_eq!(source.request_count(), 0);
    Ok(())
}

/// Structured documents flagged as failed are reported with the provider message
#[tokio::test]
async fn test_prepareContent_withProviderErrorPayload_shouldReportMessage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::structured_config(temp_dir.path());
    let source = MockSource::json(r#"{"ok":0,"errMsg":"Domain not registered"}"#);
    let controller = common::mock_controller(config, &source);

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller
        .prepare_content(&common::frontend_context(), "{jteasylaw imp}", &mut sink)
        .await;

    assert_eq!(output.text, "");
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics[0].text.starts_with("The imprint could not be loaded from the provider (status 200)."));
    assert!(output.diagnostics[0].text.contains("Domain not registered"));
    Ok(())
}

/// Pages without placeholders are returned as they are
#[test]
fn test_prepareContent_withoutPlaceholders_shouldReturnInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(common::licensed_config(temp_dir.path()), &source);
    let text = "<html><head></head><body>Nothing to see</body></html>";

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = tokio_test::block_on(controller.prepare_content(&common::frontend_context(), text, &mut sink));

    assert_eq!(output.text, text);
    assert!(output.stylesheet.is_none());
    assert_eq!(source.request_count(), 0);
    Ok(())
}

/// A configured language the provider does not offer never reaches the cache path
#[tokio::test]
async fn test_prepareContent_withPathLikeConfiguredLanguage_shouldStayInsideCacheRoot() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config {
        language: "../x".to_string(),
        ..common::licensed_config(temp_dir.path())
    };
    let source = MockSource::html(MockSource::html_page("<p>doc</p>"));
    let controller = common::mock_controller(config, &source);
    let context = easylaw::app_controller::HostContext::new("fr-FR", "example.org");

    let mut sink: Vec<HostMessage> = Vec::new();
    let output = controller.prepare_content(&context, "{jteasylaw dse}", &mut sink).await;

    assert_eq!(output.text, "<section class=\"easylaw\"><p>doc</p></section>");
    assert_eq!(source.requests()[0].language, "de");
    assert!(FileManager::file_exists(controller.cache().entry_path("de", "dse")));
    assert!(!FileManager::file_exists(temp_dir.path().join("dse.html")));
    Ok(())
}
