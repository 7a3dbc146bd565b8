//! Structured events raised while parsing and rewriting a changelog.
//!
//! Parsing never writes to a logger on its own; it hands each event to a
//! [`DiagnosticSink`]. [`TracingSink`] forwards to `tracing`, which is what
//! the CLI uses.

use std::fmt::{self, Display, Formatter};

/// `tracing` target used for notice-level events
pub const NOTICE_TARGET: &str = "notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Notice,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A version heading was recognized
    ParsedVersion { identifier: String },
    /// A `v` prefix was removed from a version label
    StrippedLeadingV { label: String },
    /// A heading was moved one level down to fit the schema
    HeadingDowngraded { text: String, from: u8, to: u8 },
    /// A blank Unreleased section was added before promoting a release
    MissingUnreleased,
}

impl Diagnostic {
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::ParsedVersion { .. } => Severity::Debug,
            Self::StrippedLeadingV { .. } | Self::HeadingDowngraded { .. } => Severity::Notice,
            Self::MissingUnreleased => Severity::Warning,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParsedVersion { identifier } => write!(f, "Parsing version: {identifier}"),
            Self::StrippedLeadingV { label } => {
                write!(f, "Stripping leading `v` from version `{label}`")
            }
            Self::HeadingDowngraded { text, from, to } => {
                write!(f, "Changing `{text}` from h{from} to h{to}")
            }
            Self::MissingUnreleased => write!(f, "No Unreleased section - adding a new empty one"),
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic),
{
    fn emit(&mut self, diagnostic: Diagnostic) {
        self(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Debug => tracing::debug!("{diagnostic}"),
            Severity::Info => tracing::info!("{diagnostic}"),
            Severity::Notice => tracing::info!(target: NOTICE_TARGET, "{diagnostic}"),
            Severity::Warning => tracing::warn!("{diagnostic}"),
        }
    }
}

/// Keeps every diagnostic it receives
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics at or above `severity`
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity() >= severity)
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
