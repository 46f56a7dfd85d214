//! Integration tests for Value, TimeOfDay and Span

use std::time::Duration;

use proptest::prelude::*;
use skript_foundation::{ObjectValue, Span, TimeOfDay, Value};

// =============================================================================
// Values
// =============================================================================

#[test]
fn value_display() {
    assert_eq!(Value::Nil.to_string(), "<none>");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::from(-4_i64).to_string(), "-4");
    assert_eq!(Value::from("hi").to_string(), "\"hi\"");
    assert_eq!(Value::from(Duration::from_secs(2)).to_string(), "2000ms");
    assert_eq!(
        Value::Object(ObjectValue::new("player", "Alice")).to_string(),
        "Alice"
    );
}

#[test]
fn value_accessors() {
    assert_eq!(Value::from(3_i64).as_number(), Some(3.0));
    assert_eq!(Value::from(2.5).as_int(), None);
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert!(Value::Nil.is_nil());
    let obj = Value::Object(ObjectValue::new("item", "sword"));
    assert_eq!(&*obj.as_object().unwrap().type_name, "item");
}

// =============================================================================
// Time of day
// =============================================================================

#[test]
fn time_bounds() {
    assert_eq!(TimeOfDay::from_hms(24, 0, 0), Some(TimeOfDay::MIDNIGHT));
    assert_eq!(TimeOfDay::from_hms(24, 0, 1), None);
    assert_eq!(TimeOfDay::from_hms(12, 60, 0), None);
    assert_eq!(TimeOfDay::from_hms(12, 0, 0), Some(TimeOfDay::NOON));
    assert_eq!(TimeOfDay::NOON.to_string(), "12:00:00");
}

proptest! {
    #[test]
    fn time_fields_round_trip(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
        let t = TimeOfDay::from_hms(h, m, s).unwrap();
        prop_assert_eq!((t.hours(), t.minutes(), t.seconds()), (h, m, s));
        prop_assert!(t.seconds_since_midnight() < TimeOfDay::SECONDS_PER_DAY);
    }
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn span_within_line() {
    let span = Span::within_line(3, 5, 10, 14);
    assert_eq!((span.line, span.column), (3, 15));
    assert_eq!(span.len(), 4);
    assert_eq!(span.text("give the sword to Alice"), "word");
}

#[test]
fn span_join_keeps_start_position() {
    let a = Span::new(0, 4, 2, 1);
    let b = Span::new(9, 14, 2, 10);
    let joined = a.to(b);
    assert_eq!((joined.start, joined.end, joined.column), (0, 14, 1));
    assert!(!joined.is_empty());
    assert!(Span::at_start().is_empty());
}
