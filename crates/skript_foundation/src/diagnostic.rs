//! Structured diagnostics.
//!
//! The parser only produces records; rendering them is the job of whatever
//! embeds it (see `skript_runtime`).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::span::Span;

/// How serious a diagnostic is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// The line could not be parsed.
    Error,
    /// The line parsed but something looks wrong.
    Warning,
    /// Informational note.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// Machine-readable classification of a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DiagnosticCode {
    /// No registered pattern matched.
    NoMatch,
    /// Two patterns could not be told apart.
    AmbiguousMatch,
    /// Literal or conversion failure reported to the user.
    TypeMismatch,
    /// A producer rejected an otherwise matching line.
    Semantic,
    /// Indentation or block structure problem.
    Structure,
    /// A local variable was read before being set.
    UnsetVariable,
    /// Nesting went too deep.
    RecursionLimit,
    /// The parse was cancelled.
    Cancelled,
    /// Anything else.
    Other,
}

impl DiagnosticCode {
    /// Short stable identifier for the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMatch => "no-match",
            Self::AmbiguousMatch => "ambiguous-match",
            Self::TypeMismatch => "type-mismatch",
            Self::Semantic => "semantic",
            Self::Structure => "structure",
            Self::UnsetVariable => "unset-variable",
            Self::RecursionLimit => "recursion-limit",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }
}

impl From<&ErrorKind> for DiagnosticCode {
    fn from(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::NoMatch { .. } => Self::NoMatch,
            ErrorKind::AmbiguousMatch { .. } => Self::AmbiguousMatch,
            ErrorKind::LiteralParse { .. } | ErrorKind::NoConversion { .. } => Self::TypeMismatch,
            ErrorKind::RecursionLimit { .. } => Self::RecursionLimit,
            ErrorKind::Cancelled => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

/// A single `(line, column, message, severity)` record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Human-readable message.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    /// Classification.
    pub code: DiagnosticCode,
}

impl Diagnostic {
    /// Creates an error diagnostic at a span.
    #[must_use]
    pub fn error(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::at(span, Severity::Error, code, message)
    }

    /// Creates a warning diagnostic at a span.
    #[must_use]
    pub fn warning(span: Span, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::at(span, Severity::Warning, code, message)
    }

    /// Creates a diagnostic at a span.
    #[must_use]
    pub fn at(
        span: Span,
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line: span.line,
            column: span.column,
            message: message.into(),
            severity,
            code,
        }
    }

    /// Converts an error raised while parsing the given span.
    #[must_use]
    pub fn from_error(span: Span, error: &Error) -> Self {
        Self::error(span, DiagnosticCode::from(&error.kind), error.to_string())
    }

    /// Returns true for error severity.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}]: {}",
            self.line,
            self.column,
            self.severity,
            self.code.as_str(),
            self.message
        )
    }
}
