//! Values that an event or section makes available to the lines inside it.
//!
//! Inside `every 5 seconds:`, `context-interval` (or plain `interval`)
//! names the interval the trigger was declared with. Names are resolved
//! against the enclosing blocks, innermost first.

use std::fmt;

use skript_foundation::PatternType;
use skript_pattern::Pattern;

use crate::context::ParseContext;
use crate::matcher::{self, Outcome};
use crate::node::SyntaxId;

/// When a value is observed relative to the event that provides it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ValueState {
    /// Before the event.
    Past,
    /// While the event happens.
    #[default]
    Present,
    /// After the event.
    Future,
}

impl ValueState {
    /// Maps the parse mark of a `past`/`future` prefix: 0 is present, 1 past
    /// and 2 future.
    #[must_use]
    pub fn from_mark(mark: i64) -> Option<Self> {
        match mark {
            0 => Some(Self::Present),
            1 => Some(Self::Past),
            2 => Some(Self::Future),
            _ => None,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Present => "present",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for ValueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a value is written with the `context-` prefix, alone, or either.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ValueUsage {
    /// Only as `context-<name>`.
    ExpressionOnly,
    /// Only as the bare name.
    AloneOnly,
    /// Both forms.
    #[default]
    ExpressionOrAlone,
}

impl ValueUsage {
    /// Returns true if the value may be written this way.
    #[must_use]
    pub fn allows(self, alone: bool) -> bool {
        match self {
            Self::ExpressionOnly => !alone,
            Self::AloneOnly => alone,
            Self::ExpressionOrAlone => true,
        }
    }
}

/// A value registered for an event or section.
#[derive(Debug)]
pub struct ContextValue {
    /// The event or section providing the value.
    pub owner: SyntaxId,
    /// Name pattern, without placeholders.
    pub pattern: Pattern,
    /// Type of the value.
    pub return_type: PatternType,
    /// When the value is observed.
    pub state: ValueState,
    /// How the value may be written.
    pub usage: ValueUsage,
}

impl ContextValue {
    /// Returns true if `name` is exactly this value's name.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        let found = matcher::run(&self.pattern, name, 0, name.len(), |_, _, _| {
            Ok(Outcome::Rejected(String::new()))
        });
        matches!(found, Ok(Ok(_)))
    }
}

/// Description of a context value to register.
///
/// ```
/// use skript_parser::{ContextValueSpec, ValueUsage};
///
/// let spec = ContextValueSpec::new("[loop-]counter", "integer").usage(ValueUsage::AloneOnly);
/// # let _ = spec;
/// ```
#[derive(Clone, Debug)]
pub struct ContextValueSpec {
    pub(crate) pattern: String,
    pub(crate) return_type: String,
    pub(crate) state: ValueState,
    pub(crate) usage: ValueUsage,
}

impl ContextValueSpec {
    /// Starts a spec for a present value usable in both forms.
    #[must_use]
    pub fn new(pattern: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            return_type: return_type.into(),
            state: ValueState::default(),
            usage: ValueUsage::default(),
        }
    }

    /// Sets the state.
    #[must_use]
    pub fn state(mut self, state: ValueState) -> Self {
        self.state = state;
        self
    }

    /// Sets the usage.
    #[must_use]
    pub fn usage(mut self, usage: ValueUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Finds the value called `name` among those of the enclosing blocks.
///
/// The first value whose name matches decides; a wrong form or state is an
/// error rather than a reason to keep looking.
///
/// # Errors
///
/// Returns the reason the value cannot be used. An unknown bare name gives
/// an empty reason, since the word may well be meant as something else.
pub fn resolve<'r>(
    ctx: &ParseContext<'r>,
    name: &str,
    state: ValueState,
    alone: bool,
) -> std::result::Result<&'r ContextValue, String> {
    let registry = ctx.registry();
    let found = ctx
        .enclosing()
        .iter()
        .rev()
        .flat_map(|&owner| registry.context_values(owner))
        .find(|value| value.is_named(name));

    let Some(value) = found else {
        return Err(if alone {
            String::new()
        } else {
            format!("no context value matching '{name}' was found")
        });
    };
    if !value.usage.allows(alone) {
        return Err(if alone {
            format!("the context value matching '{name}' cannot be used alone; use 'context-{name}'")
        } else {
            format!("the context value matching '{name}' must be used alone; use '{name}'")
        });
    }
    if value.state != state {
        return Err(format!("the time state of this context value ({state}) is incorrect"));
    }
    Ok(value)
}
