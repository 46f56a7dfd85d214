//! Skript - Pattern-driven parser front-end for the Skript scripting language
//!
//! This crate re-exports all layers of the parser for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: skript_runtime     CLI, REPL, diagnostic rendering, config files
//! Layer 3: skript_stdlib      Default types, converters and syntax
//! Layer 2: skript_parser      Registry, line/expression parser, scripts
//! Layer 1: skript_pattern     Pattern compiler and match programs
//!          skript_types       Type descriptors and converter graph
//! Layer 0: skript_foundation  Values, spans, diagnostics, errors
//! ```
//!
//! # Example
//!
//! ```
//! use skript::parser::parse_script;
//!
//! let registry = skript::stdlib::default_registry().unwrap();
//! let parsed = parse_script(&registry, "every 5 seconds:\n    print \"tick\"\n").unwrap();
//! assert!(!parsed.has_errors());
//! assert_eq!(parsed.nodes[0].children.len(), 1);
//! ```

pub use skript_foundation as foundation;
pub use skript_parser as parser;
pub use skript_pattern as pattern;
pub use skript_runtime as runtime;
pub use skript_stdlib as stdlib;
pub use skript_types as types;
