//! Error types for the Skript parser.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for Skript operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a pattern syntax error at a byte offset of the pattern text.
    #[must_use]
    pub fn pattern_syntax(
        pattern: impl Into<String>,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::PatternSyntax {
            pattern: pattern.into(),
            offset,
            message: message.into(),
        })
    }

    /// Creates an unknown type error.
    #[must_use]
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType(name.into()))
    }

    /// Creates a duplicate type error.
    #[must_use]
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateType(name.into()))
    }

    /// Creates a no-match error.
    #[must_use]
    pub fn no_match(
        category: impl Into<String>,
        input: impl Into<String>,
        near_miss: Option<String>,
    ) -> Self {
        Self::new(ErrorKind::NoMatch {
            category: category.into(),
            input: input.into(),
            near_miss,
        })
    }

    /// Creates an ambiguous match error.
    #[must_use]
    pub fn ambiguous_match(
        category: impl Into<String>,
        pattern: impl Into<String>,
        existing: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::AmbiguousMatch {
            category: category.into(),
            pattern: pattern.into(),
            existing: existing.into(),
        })
    }

    /// Creates a literal parse error.
    #[must_use]
    pub fn literal_parse(type_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(ErrorKind::LiteralParse {
            type_name: type_name.into(),
            input: input.into(),
        })
    }

    /// Creates a no-conversion error.
    #[must_use]
    pub fn no_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoConversion {
            from: from.into(),
            to: to.into(),
        })
    }

    /// Creates a recursion limit error.
    #[must_use]
    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(ErrorKind::RecursionLimit { limit })
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Returns true if this error must abort the whole parse unit instead of
    /// only rejecting the current candidate.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RecursionLimit { .. } | ErrorKind::Cancelled | ErrorKind::Internal(_)
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A registered pattern is malformed.
    #[error("invalid pattern '{pattern}' at offset {offset}: {message}")]
    PatternSyntax {
        /// The pattern source text.
        pattern: String,
        /// Byte offset of the problem in the pattern text.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// A type name is not registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A type name (singular or plural) is already registered.
    #[error("type already registered: {0}")]
    DuplicateType(String),

    /// Input matched no registered pattern of a category.
    #[error("can't understand this {category}: '{input}'{}", near_miss_suffix(.near_miss.as_deref()))]
    NoMatch {
        /// The syntax category that was tried.
        category: String,
        /// The input that failed to match.
        input: String,
        /// The most plausible near-miss, rendered for humans.
        near_miss: Option<String>,
    },

    /// Two top-ranked candidates cannot be told apart.
    #[error("ambiguous {category} pattern '{pattern}': indistinguishable from '{existing}'")]
    AmbiguousMatch {
        /// The syntax category.
        category: String,
        /// The pattern being registered.
        pattern: String,
        /// The pattern it collides with.
        existing: String,
    },

    /// A literal parser rejected its input.
    #[error("'{input}' is not a valid {type_name}")]
    LiteralParse {
        /// The target type name.
        type_name: String,
        /// The rejected text.
        input: String,
    },

    /// No converter path exists between two types.
    #[error("no conversion from {from} to {to}")]
    NoConversion {
        /// Source type name.
        from: String,
        /// Target type name.
        to: String,
    },

    /// Recursive parsing went deeper than the configured limit.
    #[error("recursion limit ({limit}) exceeded")]
    RecursionLimit {
        /// The configured limit.
        limit: usize,
    },

    /// The parse was cancelled cooperatively.
    #[error("parse cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while reading scripts or configuration.
    #[error("i/o error: {0}")]
    Io(std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

fn near_miss_suffix(near_miss: Option<&str>) -> String {
    near_miss.map_or_else(String::new, |n| format!(" ({n})"))
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Script name or other source label.
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<usize>,
    /// Column number in source.
    pub column: Option<usize>,
    /// Chain of enclosing constructs being parsed.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
