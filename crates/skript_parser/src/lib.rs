//! Syntax registry, pattern matcher and script parser for Skript.
//!
//! Lines of a script are matched against registered syntax patterns; the
//! placeholders of a matching pattern are parsed recursively as typed
//! expressions.
//!
//! # Architecture
//!
//! ```text
//! "give the sword to Alice"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   REGISTRY      │  → candidates for `effect`, by priority and specificity
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   MATCHER       │  → "give [the] %item% to %player%" with split points
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   EXPRESSIONS   │  → "sword": item literal, "Alice": player literal
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   PRODUCER      │  → SyntaxNode { arguments: [sword, Alice], .. }
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`] - Registration of types, converters and syntax
//! - [`parser`] - Line and expression entry points
//! - [`script`] - Whole scripts with comments, indentation and blocks
//! - [`context`] - Per-parse state: scopes, diagnostics, depth
//! - [`context_value`] - Values provided by enclosing events and sections
//! - [`node`] - The syntax tree
//! - [`config`] - Parser configuration
//! - [`cancel`] - Cooperative cancellation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cancel;
pub mod config;
pub mod context;
pub mod context_value;
mod expression;
mod matcher;
pub mod node;
pub mod parser;
pub mod registry;
pub mod script;

pub use cancel::CancellationToken;
pub use config::{AmbiguityPolicy, DEFAULT_MAX_DEPTH, DEFAULT_PRIORITY, ParserConfig};
pub use context::{Checkpoint, NearMiss, ParseContext};
pub use context_value::{ContextValue, ContextValueSpec, ValueState, ValueUsage};
pub use node::{Conjunction, Expr, ExprKind, SyntaxCategory, SyntaxId, SyntaxNode};
pub use parser::{parse_expression, parse_line};
pub use registry::{
    AcceptAll, Ambiguity, Candidate, ProduceResult, Producer, Registry, RegistryBuilder,
    SyntaxDefinition, SyntaxSpec,
};
pub use script::{ScriptParse, parse_script, parse_script_with};
