//! Literal parse/format round-trips of the default types

use std::time::Duration;

use proptest::prelude::*;
use skript_foundation::{TimeOfDay, Value};
use skript_parser::Registry;
use skript_stdlib::{format_duration, format_number, parse_duration, parse_number, parse_time};

fn registry() -> Registry {
    skript_stdlib::default_registry().unwrap()
}

/// Parses `text` as `type_name`, formats it and parses the result again.
fn round_trip(registry: &Registry, type_name: &str, text: &str) -> (Value, Value) {
    let types = registry.types();
    let id = types.type_id(type_name).unwrap();
    let value = types.parse_literal(id, text).unwrap();
    let formatted = types.format_value(id, &value);
    let again = types.parse_literal(id, &formatted).unwrap();
    (value, again)
}

#[test]
fn default_types_round_trip() {
    let reg = registry();
    for (ty, text) in [
        ("number", "42"),
        ("number", "-2.5"),
        ("number", "3.0"),
        ("integer", "7"),
        ("boolean", "TRUE"),
        ("duration", "1 minute and 30 seconds"),
        ("duration", "3 ticks"),
        ("duration", "an hour, 2 minutes and 5 seconds"),
        ("time", "6:30"),
        ("time", "23:59:59"),
    ] {
        let (value, again) = round_trip(&reg, ty, text);
        assert_eq!(value, again, "{ty} {text:?}");
    }
}

#[test]
fn formatting_is_canonical() {
    assert_eq!(format_number(&Value::Number(3.0)), "3.0");
    assert_eq!(format_duration(Duration::from_secs(90)), "1 minute and 30 seconds");
    assert_eq!(format_duration(Duration::ZERO), "0 seconds");
    assert_eq!(parse_time("6:30"), TimeOfDay::from_hms(6, 30, 0));
    assert_eq!(parse_time("6:3"), None);
    assert_eq!(parse_duration("5 parsecs"), None);
}

proptest! {
    #[test]
    fn integers_round_trip(n in any::<i64>()) {
        let value = Value::Int(n);
        prop_assert_eq!(parse_number(&format_number(&value)), Some(value));
    }

    #[test]
    fn decimals_round_trip(n in -1.0e9f64..1.0e9) {
        let value = parse_number(&format!("{n}")).unwrap();
        let again = parse_number(&format_number(&value)).unwrap();
        prop_assert_eq!(value.as_number(), again.as_number());
    }

    #[test]
    fn durations_round_trip(millis in 0u64..(10 * 7 * 24 * 60 * 60 * 1000)) {
        let duration = Duration::from_millis(millis);
        prop_assert_eq!(parse_duration(&format_duration(duration)), Some(duration));
    }

    #[test]
    fn times_round_trip(h in 0u32..24, m in 0u32..60, s in 0u32..60) {
        let reg = registry();
        let text = format!("{h}:{m:02}:{s:02}");
        let (value, again) = round_trip(&reg, "time", &text);
        prop_assert_eq!(value, again);
    }
}
