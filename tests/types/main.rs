//! Integration tests for Layer 1: Types
//!
//! Tests for type registration, assignability, the converter graph and
//! literal round-trips of the default types.

mod conversions;
mod literals;
