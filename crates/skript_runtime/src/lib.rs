//! CLI, REPL and diagnostic rendering for the Skript parser.
//!
//! This crate provides:
//! - [`Repl`] - Interactive line parser with tree and diagnostic output
//! - [`render`] - Human-readable and JSON rendering of trees and diagnostics
//! - [`config`] - `key: value` configuration files for [`skript_parser::ParserConfig`]
//! - [`logging`] - `tracing` subscriber setup for the binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod highlight;
pub mod logging;
pub mod render;
pub mod repl;

pub use config::{load_config, parse_config};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use render::{Renderer, render_tree};
pub use repl::Repl;
