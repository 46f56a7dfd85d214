//! Integration tests for Layer 2: Parser
//!
//! Tests for the registry, line and expression parsing, script structure,
//! limits and concurrent use of one registry.

mod limits;
mod scenarios;
mod scripts;

use skript_foundation::{ObjectValue, Value};
use skript_parser::{Registry, RegistryBuilder, SyntaxCategory};
use skript_types::TypeDescriptor;

const ITEMS: [&str; 4] = ["sword", "apple", "diamond sword", "torch"];

/// Accepts the known item names.
pub fn parse_item(text: &str) -> Option<Value> {
    let text = text.trim();
    ITEMS
        .iter()
        .any(|item| item.eq_ignore_ascii_case(text))
        .then(|| Value::Object(ObjectValue::new("item", &text.to_lowercase())))
}

/// Accepts one capitalised word.
pub fn parse_player(text: &str) -> Option<Value> {
    let text = text.trim();
    let capitalised = text.chars().next().is_some_and(char::is_uppercase);
    (capitalised && text.chars().all(char::is_alphabetic))
        .then(|| Value::Object(ObjectValue::new("player", text)))
}

/// `object`, `item`, `player` and `number`, with no syntax.
pub fn game_builder() -> RegistryBuilder {
    let mut b = RegistryBuilder::new();
    b.register_type(TypeDescriptor::universal("object", "objects"))
        .unwrap();
    b.register_type(TypeDescriptor::new("item", "items").with_literal_parser(parse_item))
        .unwrap();
    b.register_type(TypeDescriptor::new("player", "players").with_literal_parser(parse_player))
        .unwrap();
    b.register_type(
        TypeDescriptor::new("number", "numbers")
            .with_literal_parser(|s| s.trim().parse::<i64>().ok().map(Value::Int)),
    )
    .unwrap();
    b
}

/// The game types plus the `give` effect.
pub fn give_registry() -> Registry {
    let mut b = game_builder();
    b.register_syntax(
        SyntaxCategory::Effect,
        "give [the] %item% to %player%",
        5,
        |node, _| Ok(node),
    )
    .unwrap();
    b.build()
}

/// The default registry.
pub fn defaults() -> Registry {
    skript_stdlib::default_registry().unwrap()
}
