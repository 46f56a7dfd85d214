//! Type descriptors.

use std::fmt;
use std::sync::Arc;

use skript_foundation::Value;

/// Turns literal text into a value, or `None` when the text is not a literal
/// of the type.
pub type LiteralParser = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// Renders a value of a type as script text.
pub type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Description of one registered type.
///
/// ```
/// use skript_foundation::Value;
/// use skript_types::TypeDescriptor;
///
/// let boolean = TypeDescriptor::new("boolean", "booleans")
///     .with_literal_parser(|s| match s.to_ascii_lowercase().as_str() {
///         "true" => Some(Value::Bool(true)),
///         "false" => Some(Value::Bool(false)),
///         _ => None,
///     });
/// assert_eq!(boolean.parse("TRUE"), Some(Value::Bool(true)));
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    /// Singular name, as written in `%name%`.
    pub name: String,
    /// Plural name, as written in `%names%`.
    pub plural: String,
    /// Name of the direct supertype, if any.
    pub supertype: Option<String>,
    /// Whether every type is assignable to this one.
    pub universal: bool,
    literal_parser: Option<LiteralParser>,
    formatter: Option<Formatter>,
}

impl TypeDescriptor {
    /// Creates a descriptor with no parser, formatter or supertype.
    #[must_use]
    pub fn new(name: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plural: plural.into(),
            supertype: None,
            universal: false,
            literal_parser: None,
            formatter: None,
        }
    }

    /// Creates a universal descriptor (the `object` type).
    #[must_use]
    pub fn universal(name: impl Into<String>, plural: impl Into<String>) -> Self {
        Self {
            universal: true,
            ..Self::new(name, plural)
        }
    }

    /// Sets the direct supertype.
    #[must_use]
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    /// Sets the literal parser.
    #[must_use]
    pub fn with_literal_parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.literal_parser = Some(Arc::new(parser));
        self
    }

    /// Sets the formatter.
    #[must_use]
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Returns true if this type can be written as a literal.
    #[must_use]
    pub fn has_literal_parser(&self) -> bool {
        self.literal_parser.is_some()
    }

    /// Parses literal text with this type's parser.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<Value> {
        self.literal_parser.as_ref().and_then(|p| p(text))
    }

    /// Formats a value, falling back to the value's own display form.
    #[must_use]
    pub fn format(&self, value: &Value) -> String {
        match &self.formatter {
            Some(f) => f(value),
            None => match value {
                Value::String(s) => s.to_string(),
                other => other.to_string(),
            },
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("plural", &self.plural)
            .field("supertype", &self.supertype)
            .field("universal", &self.universal)
            .field("literal_parser", &self.literal_parser.is_some())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}
