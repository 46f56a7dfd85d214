//! Parser configuration.

/// Default limit on nested sub-parses.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Priority given to syntax registered without one.
pub const DEFAULT_PRIORITY: i32 = 5;

/// What to do when a pattern is registered that cannot be told apart from an
/// earlier one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Record and log it; the earlier registration wins.
    #[default]
    Warn,
    /// Fail the registration.
    Deny,
}

/// Configuration for registration and parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of sub-expression parses on one line.
    pub max_depth: usize,

    /// Maximum converter chain length.
    pub max_conversion_depth: usize,

    /// Separators that split list-valued placeholders, tried in order.
    pub list_separators: Vec<String>,

    /// Handling of indistinguishable registrations.
    pub ambiguity: AmbiguityPolicy,

    /// Whether effects may appear outside any event.
    pub allow_top_level_statements: bool,

    /// Warn when a local variable is read before it is set.
    pub warn_unset_locals: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_conversion_depth: skript_types::MAX_CONVERSION_DEPTH,
            list_separators: vec![",".to_string(), "and".to_string(), "or".to_string()],
            ambiguity: AmbiguityPolicy::Warn,
            allow_top_level_statements: true,
            warn_unset_locals: true,
        }
    }
}

impl ParserConfig {
    /// Creates a configuration that rejects ambiguous registrations and
    /// statements outside events.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::Deny,
            allow_top_level_statements: false,
            ..Self::default()
        }
    }

    /// Builder method to set the recursion limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder method to set the converter chain limit.
    #[must_use]
    pub fn with_max_conversion_depth(mut self, depth: usize) -> Self {
        self.max_conversion_depth = depth;
        self
    }

    /// Builder method to set list separators.
    #[must_use]
    pub fn with_list_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.list_separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set the ambiguity policy.
    #[must_use]
    pub fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Builder method to allow or forbid top-level statements.
    #[must_use]
    pub fn with_top_level_statements(mut self, allow: bool) -> Self {
        self.allow_top_level_statements = allow;
        self
    }

    /// Builder method to toggle unset-local warnings.
    #[must_use]
    pub fn with_unset_local_warnings(mut self, warn: bool) -> Self {
        self.warn_unset_locals = warn;
        self
    }
}
