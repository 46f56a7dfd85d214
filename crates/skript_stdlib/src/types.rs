//! Default types: literal parsers, formatters and converters.

use std::time::Duration;

use skript_foundation::{Result, TimeOfDay, Value};
use skript_parser::RegistryBuilder;
use skript_types::TypeDescriptor;

/// Milliseconds in one game tick.
pub const TICK_MILLIS: u64 = 50;

/// Duration units, largest first, as `(singular, plural, milliseconds)`.
const UNITS: [(&str, &str, u64); 7] = [
    ("week", "weeks", 7 * 24 * 60 * 60 * 1000),
    ("day", "days", 24 * 60 * 60 * 1000),
    ("hour", "hours", 60 * 60 * 1000),
    ("minute", "minutes", 60 * 1000),
    ("second", "seconds", 1000),
    ("tick", "ticks", TICK_MILLIS),
    ("millisecond", "milliseconds", 1),
];

pub(crate) fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register_type(TypeDescriptor::universal("object", "objects"))?;
    builder.register_type(
        TypeDescriptor::new("number", "numbers")
            .with_literal_parser(parse_number)
            .with_formatter(format_number),
    )?;
    builder.register_type(
        TypeDescriptor::new("integer", "integers")
            .with_supertype("number")
            .with_literal_parser(|s| parse_number(s).filter(|v| matches!(v, Value::Int(_))))
            .with_formatter(format_number),
    )?;
    builder.register_type(TypeDescriptor::new("string", "strings"))?;
    builder.register_type(
        TypeDescriptor::new("boolean", "booleans")
            .with_literal_parser(parse_boolean)
            .with_formatter(|v| match v.as_bool() {
                Some(b) => b.to_string(),
                None => v.to_string(),
            }),
    )?;
    builder.register_type(
        TypeDescriptor::new("duration", "durations")
            .with_literal_parser(|s| parse_duration(s).map(Value::Duration))
            .with_formatter(|v| match v.as_duration() {
                Some(d) => format_duration(d),
                None => v.to_string(),
            }),
    )?;
    builder.register_type(
        TypeDescriptor::new("time", "times")
            .with_literal_parser(|s| parse_time(s).map(Value::Time))
            .with_formatter(|v| v.to_string()),
    )?;

    builder.register_converter("number", "integer", number_to_integer)?;
    Ok(())
}

// =============================================================================
// Numbers
// =============================================================================

/// Parses a decimal number. Text without a `.` becomes an integer when it
/// fits in one.
#[must_use]
pub fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let dots = digits.chars().filter(|&c| c == '.').count();
    if dots > 1
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    if dots == 0 {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Value::Int(n));
        }
    }
    text.parse::<f64>().ok().filter(|f| f.is_finite()).map(Value::Number)
}

/// Renders a number so that [`parse_number`] reads it back as the same value.
#[must_use]
pub fn format_number(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Number(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.1}"),
        Value::Number(f) => f.to_string(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Int(n) => Some(Value::Int(*n)),
        Value::Number(f)
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
        {
            Some(Value::Int(*f as i64))
        }
        _ => None,
    }
}

fn parse_boolean(text: &str) -> Option<Value> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

// =============================================================================
// Durations
// =============================================================================

/// Parses durations such as `5 seconds`, `a minute` or
/// `1 hour, 2 minutes and 3.5 seconds`. Amounts are rounded to whole
/// milliseconds.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn parse_duration(text: &str) -> Option<Duration> {
    let lower = text.to_lowercase().replace(',', " , ");
    let mut total: u64 = 0;
    let mut part: Vec<&str> = Vec::new();

    let mut close = |part: &mut Vec<&str>| -> Option<()> {
        let [amount, unit] = part.as_slice() else {
            return None;
        };
        let amount = match *amount {
            "a" | "an" => 1.0,
            n => match parse_number(n)? {
                Value::Int(i) => i as f64,
                Value::Number(f) => f,
                _ => return None,
            },
        };
        let (_, _, millis) = UNITS
            .iter()
            .find(|(singular, plural, _)| unit == singular || unit == plural)?;
        let millis = (amount * *millis as f64).round();
        if !(0.0..u64::MAX as f64).contains(&millis) {
            return None;
        }
        total = total.checked_add(millis as u64)?;
        part.clear();
        Some(())
    };

    for word in lower.split_whitespace() {
        if word == "and" || word == "," {
            close(&mut part)?;
        } else {
            part.push(word);
        }
    }
    close(&mut part)?;
    Some(Duration::from_millis(total))
}

/// Renders a duration in whole units, largest first: `1 minute and 30 seconds`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let mut rest = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if rest == 0 {
        return "0 seconds".to_string();
    }
    let mut pieces = Vec::new();
    for (singular, plural, millis) in UNITS {
        if singular == "tick" {
            continue;
        }
        let count = rest / millis;
        rest %= millis;
        if count > 0 {
            let unit = if count == 1 { singular } else { plural };
            pieces.push(format!("{count} {unit}"));
        }
    }
    match pieces.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{} and {last}", init.join(", ")),
        None => "0 seconds".to_string(),
    }
}

// =============================================================================
// Times
// =============================================================================

/// Parses `HH:mm` or `HH:mm:ss`.
#[must_use]
pub fn parse_time(text: &str) -> Option<TimeOfDay> {
    let fields: Vec<&str> = text.trim().split(':').collect();
    let number = |s: &str, min_len: usize| -> Option<u32> {
        if s.len() < min_len || s.len() > 2 || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };
    match fields.as_slice() {
        [h, m] => TimeOfDay::from_hms(number(h, 1)?, number(m, 2)?, 0),
        [h, m, s] => TimeOfDay::from_hms(number(h, 1)?, number(m, 2)?, number(s, 2)?),
        _ => None,
    }
}
