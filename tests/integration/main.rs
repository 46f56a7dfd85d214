//! Cross-layer integration tests for Skript
//!
//! Tests that verify correct interaction between multiple crates.

mod pipeline;
mod session;
