//! Default types and syntax for the Skript parser.
//!
//! This crate registers:
//! - Types: `object`, `number`, `integer`, `string`, `boolean`, `duration`, `time`
//! - Expressions: arithmetic, boolean operators, `whether`, time constants,
//!   `length of`, random numbers, context values
//! - Conditions: divisibility, chance, primality
//! - Effects: `print`, `set`, `wait`, `return`
//! - Events: script load, periodical, at time, `when`, with their
//!   `script`, `interval` and `time` context values
//! - Sections: `if`, `while`, `loop`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod conditions;
mod effects;
mod events;
mod expressions;
mod sections;
pub mod types;

use skript_foundation::Result;
use skript_parser::{ParserConfig, Registry, RegistryBuilder, SyntaxCategory};

pub use expressions::ARITHMETIC;
pub use types::{format_duration, format_number, parse_duration, parse_number, parse_time};

/// Registers every default type, converter and syntax element.
///
/// # Errors
///
/// Fails if a default type is already registered or, under
/// [`skript_parser::AmbiguityPolicy::Deny`], if a default pattern collides
/// with an earlier registration.
pub fn register_defaults(builder: &mut RegistryBuilder) -> Result<()> {
    types::register(builder)?;
    expressions::register(builder)?;
    conditions::register(builder)?;
    effects::register(builder)?;
    events::register(builder)?;
    sections::register(builder)?;
    tracing::debug!("default syntax registered");
    Ok(())
}

/// Builds a registry holding only the defaults.
///
/// # Errors
///
/// See [`register_defaults`].
pub fn default_registry() -> Result<Registry> {
    default_registry_with(ParserConfig::default())
}

/// Builds a registry holding only the defaults, with a configuration.
///
/// # Errors
///
/// See [`register_defaults`].
pub fn default_registry_with(config: ParserConfig) -> Result<Registry> {
    let mut builder = RegistryBuilder::with_config(config);
    register_defaults(&mut builder)?;
    Ok(builder.build())
}

/// Number of definitions per category.
#[must_use]
pub fn summary(registry: &Registry) -> Vec<(SyntaxCategory, usize)> {
    SyntaxCategory::ALL
        .iter()
        .map(|&c| {
            let count = registry
                .definitions()
                .iter()
                .filter(|d| d.category == c)
                .count();
            (c, count)
        })
        .collect()
}
