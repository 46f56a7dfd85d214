//! Type system for the Skript parser.
//!
//! This crate provides:
//! - [`TypeDescriptor`] - Name, plural, supertype, literal parser and formatter of a type
//! - [`TypeSystemBuilder`] - Mutable registration of types and converters
//! - [`TypeSystem`] - Frozen, shareable type table with cached conversion paths
//! - [`TypeLookup`] - Name resolution used by the pattern compiler

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod convert;
pub mod descriptor;
pub mod system;

pub use convert::{ConversionPath, ConverterFn, MAX_CONVERSION_DEPTH};
pub use descriptor::{Formatter, LiteralParser, TypeDescriptor};
pub use system::{TypeLookup, TypeSystem, TypeSystemBuilder};
