/*!
 * User-facing diagnostics collected during a page pass.
 *
 * Diagnostics are separate from logging: they are meant for the site owner and
 * are handed to the host's message system, grouped by severity.
 */

use log::{error, warn};

/// Separator between messages of one group
pub const MESSAGE_SEPARATOR: &str = "<br />";

/// Trailer appended to every error group
pub const CONFIGURATION_HINT: &str =
    "Please check your configuration: license key, registered domain and document type.";

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One message produced while processing a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub text: String,
}

impl Diagnostic {
    pub fn warning(text: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { severity: Severity::Error, text: text.into() }
    }
}

/// Receiver of host messages
pub trait MessageSink {
    /// Queue a message for display
    fn enqueue(&mut self, severity: Severity, message: &str);
}

/// Message queued for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMessage {
    pub severity: Severity,
    pub message: String,
}

impl MessageSink for Vec<HostMessage> {
    fn enqueue(&mut self, severity: Severity, message: &str) {
        self.push(HostMessage { severity, message: message.to_string() });
    }
}

/// Sink forwarding host messages to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn enqueue(&mut self, severity: Severity, message: &str) {
        let message = message.replace(MESSAGE_SEPARATOR, "\n");
        match severity {
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}

/// Group diagnostics by severity, in order of first appearance
///
/// Messages of a group are joined with [`MESSAGE_SEPARATOR`]; error groups end
/// with [`CONFIGURATION_HINT`].
pub fn group_messages(diagnostics: &[Diagnostic]) -> Vec<HostMessage> {
    let mut groups: Vec<(Severity, Vec<&str>)> = Vec::new();

    for diagnostic in diagnostics {
        match groups.iter_mut().find(|(severity, _)| *severity == diagnostic.severity) {
            Some((_, texts)) => texts.push(&diagnostic.text),
            None => groups.push((diagnostic.severity, vec![&diagnostic.text])),
        }
    }

    groups
        .into_iter()
        .map(|(severity, mut texts)| {
            if severity == Severity::Error {
                texts.push(CONFIGURATION_HINT);
            }
            HostMessage { severity, message: texts.join(MESSAGE_SEPARATOR) }
        })
        .collect()
}

/// Hand grouped diagnostics to a sink
pub fn surface(diagnostics: &[Diagnostic], sink: &mut impl MessageSink) {
    for group in group_messages(diagnostics) {
        sink.enqueue(group.severity, &group.message);
    }
}
