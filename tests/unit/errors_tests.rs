/*!
 * Tests for error types
 */

use easylaw::errors::{AppError, CacheError, ConfigError, FetchError, RenderError};

#[test]
fn test_fetchError_status_shouldExposeCodeAndBody() {
    let error = FetchError::Status {
        status_code: 403,
        body: "license not valid for domain".to_string(),
    };

    assert_eq!(error.status_code(), 403);
    assert_eq!(error.detail(), "license not valid for domain");
    assert_eq!(error.to_string(), "Provider responded with status 403");
}

#[test]
fn test_fetchError_withoutResponse_shouldHaveStatusZero() {
    let error = FetchError::RequestFailed("connection refused".to_string());

    assert_eq!(error.status_code(), 0);
    assert_eq!(error.detail(), "Request failed: connection refused");
}

#[test]
fn test_configError_messages_shouldNameTheProblem() {
    assert!(ConfigError::MissingLicenseKey.to_string().contains("license key"));
    assert_eq!(
        ConfigError::InvalidLicenseKey { expected: 25, actual: 3 }.to_string(),
        "The license key must be exactly 25 characters long, found 3."
    );
}

#[test]
fn test_appError_fromComponentErrors_shouldWrap() {
    let app_error: AppError = ConfigError::MissingLicenseKey.into();
    assert!(matches!(app_error, AppError::Config(ConfigError::MissingLicenseKey)));

    let app_error: AppError = RenderError::MissingBody.into();
    assert!(matches!(app_error, AppError::Render(RenderError::MissingBody)));

    let app_error: AppError = CacheError::Io {
        path: "/tmp/x".to_string(),
        message: "denied".to_string(),
    }
    .into();
    assert!(app_error.to_string().contains("/tmp/x"));
}

#[test]
fn test_appError_fromFetchError_shouldKeepStatus() {
    let app_error: AppError = FetchError::Status {
        status_code: 502,
        body: String::new(),
    }
    .into();

    assert!(matches!(app_error, AppError::Fetch(ref fetch) if fetch.status_code() == 502));
    assert_eq!(app_error.to_string(), "Fetch error: Provider responded with status 502");
}
