//! Literal values produced while parsing.
//!
//! Values only appear where the parser can fully determine them: literal
//! arguments and literal-to-literal conversions. Everything else stays a
//! syntax node.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parsed literal value.
///
/// Values are immutable and cheaply cloneable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// The absence of a value.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Number(f64),
    /// String value.
    String(Arc<str>),
    /// Span of time, millisecond precision.
    Duration(Duration),
    /// Time of day.
    Time(TimeOfDay),
    /// Value of an extension-defined type, identified by its text.
    Object(ObjectValue),
}

impl Value {
    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a numeric value, widening integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a duration.
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Attempts to extract a time of day.
    #[must_use]
    pub const fn as_time(&self) -> Option<TimeOfDay> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Attempts to extract an extension object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Self::Duration(d)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "<none>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Duration(d) => write!(f, "{}ms", d.as_millis()),
            Self::Time(t) => write!(f, "{t}"),
            Self::Object(o) => write!(f, "{}", o.text),
        }
    }
}

/// Time of day with second precision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeOfDay {
    seconds: u32,
}

impl TimeOfDay {
    /// Seconds in one day.
    pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

    /// Midnight (00:00:00).
    pub const MIDNIGHT: Self = Self { seconds: 0 };

    /// Noon (12:00:00).
    pub const NOON: Self = Self {
        seconds: 12 * 60 * 60,
    };

    /// Creates a time from hours, minutes and seconds.
    ///
    /// Returns `None` when a component is out of range. Hour 24 is accepted
    /// only as `24:00:00` and wraps to midnight.
    #[must_use]
    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Option<Self> {
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        if hours == 24 && minutes == 0 && seconds == 0 {
            return Some(Self::MIDNIGHT);
        }
        if hours >= 24 {
            return None;
        }
        Some(Self {
            seconds: hours * 3600 + minutes * 60 + seconds,
        })
    }

    /// Hours component (0-23).
    #[must_use]
    pub const fn hours(self) -> u32 {
        self.seconds / 3600
    }

    /// Minutes component (0-59).
    #[must_use]
    pub const fn minutes(self) -> u32 {
        (self.seconds / 60) % 60
    }

    /// Seconds component (0-59).
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.seconds % 60
    }

    /// Seconds elapsed since midnight.
    #[must_use]
    pub const fn seconds_since_midnight(self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}

/// A value of a type registered by an extension (items, players, ...).
///
/// The parser never interprets these; the literal text is the identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectValue {
    /// Name of the type that produced this value.
    pub type_name: Arc<str>,
    /// The literal text the value was parsed from.
    pub text: Arc<str>,
}

impl ObjectValue {
    /// Creates a new extension object value.
    #[must_use]
    pub fn new(type_name: &str, text: &str) -> Self {
        Self {
            type_name: type_name.into(),
            text: text.into(),
        }
    }
}
