//! Core values, type ids, spans, diagnostics and errors for the Skript parser.
//!
//! This crate provides:
//! - [`Value`] - Literal values produced by type literal parsers and converters
//! - [`TypeId`] / [`PatternType`] - Handles to registered types, with cardinality
//! - [`Span`] - Source positions for error reporting
//! - [`Diagnostic`] - Structured `(line, column, message, severity)` records
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod types;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use error::{Error, ErrorContext, ErrorKind};
pub use span::Span;
pub use types::{PatternType, TypeId};
pub use value::{ObjectValue, TimeOfDay, Value};

/// Result type alias using the Skript [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
