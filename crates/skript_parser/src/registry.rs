//! Syntax registration.
//!
//! Registration happens once, single-threaded, through a [`RegistryBuilder`].
//! [`RegistryBuilder::build`] freezes everything into a [`Registry`] that is
//! immutable and can be shared by reference across threads.

use std::fmt;
use std::sync::Arc;

use skript_foundation::{Error, PatternType, Result, TypeId, Value};
use skript_pattern::Pattern;
use skript_types::{TypeDescriptor, TypeLookup, TypeSystem, TypeSystemBuilder};

use crate::config::{AmbiguityPolicy, DEFAULT_PRIORITY, ParserConfig};
use crate::context::ParseContext;
use crate::context_value::{ContextValue, ContextValueSpec};
use crate::node::{SyntaxCategory, SyntaxId, SyntaxNode};

/// What a producer returns: the finished node, or a message explaining why
/// the match is rejected.
pub type ProduceResult = std::result::Result<SyntaxNode, String>;

/// Builds (or rejects) the node for a structurally matched line.
///
/// Implemented for every suitable closure.
pub trait Producer: Send + Sync {
    /// Turns a matched node into the final node.
    ///
    /// # Errors
    ///
    /// Returns a message when the arguments are unacceptable; the parser then
    /// moves on to the next candidate and records the message as a near-miss.
    /// An empty message rejects the match without a reason of its own.
    fn produce(&self, node: SyntaxNode, ctx: &mut ParseContext<'_>) -> ProduceResult;
}

impl<F> Producer for F
where
    F: Fn(SyntaxNode, &mut ParseContext<'_>) -> ProduceResult + Send + Sync,
{
    fn produce(&self, node: SyntaxNode, ctx: &mut ParseContext<'_>) -> ProduceResult {
        self(node, ctx)
    }
}

/// Producer that accepts every match unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct AcceptAll;

impl Producer for AcceptAll {
    fn produce(&self, node: SyntaxNode, _ctx: &mut ParseContext<'_>) -> ProduceResult {
        Ok(node)
    }
}

/// A registered syntax element.
pub struct SyntaxDefinition {
    /// Handle of this definition.
    pub id: SyntaxId,
    /// Display name, the first pattern unless given.
    pub name: Arc<str>,
    /// Category.
    pub category: SyntaxCategory,
    /// Alternative patterns, any of which may match.
    pub patterns: Vec<Pattern>,
    /// Higher is tried first.
    pub priority: i32,
    /// Declared return type for expressions and conditions.
    pub return_type: Option<PatternType>,
    producer: Arc<dyn Producer>,
}

impl SyntaxDefinition {
    /// Runs the producer.
    ///
    /// # Errors
    ///
    /// Returns the producer's rejection message.
    pub fn produce(&self, node: SyntaxNode, ctx: &mut ParseContext<'_>) -> ProduceResult {
        self.producer.produce(node, ctx)
    }
}

impl fmt::Debug for SyntaxDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("patterns", &self.patterns.iter().map(Pattern::source).collect::<Vec<_>>())
            .field("priority", &self.priority)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// One pattern of one definition, in matching order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The definition.
    pub syntax: SyntaxId,
    /// Index into the definition's patterns.
    pub pattern: usize,
}

/// Two registrations that cannot be told apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ambiguity {
    /// Category of both registrations.
    pub category: SyntaxCategory,
    /// The later pattern.
    pub pattern: String,
    /// The earlier pattern, which wins.
    pub existing: String,
    /// Shared priority.
    pub priority: i32,
}

/// Description of a syntax element to register.
///
/// ```
/// use skript_parser::{RegistryBuilder, SyntaxCategory, SyntaxSpec};
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register(SyntaxSpec::new(SyntaxCategory::Effect).pattern("stop [the] script"))
///     .unwrap();
/// let registry = builder.build();
/// assert_eq!(registry.candidates(SyntaxCategory::Effect).len(), 1);
/// ```
pub struct SyntaxSpec {
    category: SyntaxCategory,
    name: Option<String>,
    patterns: Vec<String>,
    priority: i32,
    return_type: Option<String>,
    producer: Arc<dyn Producer>,
}

impl SyntaxSpec {
    /// Starts a spec for the given category.
    #[must_use]
    pub fn new(category: SyntaxCategory) -> Self {
        Self {
            category,
            name: None,
            patterns: Vec::new(),
            priority: DEFAULT_PRIORITY,
            return_type: None,
            producer: Arc::new(AcceptAll),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a pattern.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Adds several patterns.
    #[must_use]
    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the return type by name (singular or plural).
    #[must_use]
    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    /// Sets the producer from a closure.
    #[must_use]
    pub fn produce_with<F>(mut self, producer: F) -> Self
    where
        F: Fn(SyntaxNode, &mut ParseContext<'_>) -> ProduceResult + Send + Sync + 'static,
    {
        self.producer = Arc::new(producer);
        self
    }

    /// Sets the producer.
    #[must_use]
    pub fn producer(mut self, producer: Arc<dyn Producer>) -> Self {
        self.producer = producer;
        self
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Mutable registration phase.
pub struct RegistryBuilder {
    types: TypeSystemBuilder,
    definitions: Vec<SyntaxDefinition>,
    context_values: Vec<ContextValue>,
    ambiguities: Vec<Ambiguity>,
    config: ParserConfig,
}

impl RegistryBuilder {
    /// Creates an empty builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates an empty builder with the given configuration.
    #[must_use]
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            types: TypeSystemBuilder::new().with_max_conversion_depth(config.max_conversion_depth),
            definitions: Vec::new(),
            context_values: Vec::new(),
            ambiguities: Vec::new(),
            config,
        }
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Replaces the configuration. Affects registrations made afterwards.
    pub fn set_config(&mut self, config: ParserConfig) {
        self.types.set_max_conversion_depth(config.max_conversion_depth);
        self.config = config;
    }

    /// Registers a type.
    ///
    /// # Errors
    ///
    /// See [`TypeSystemBuilder::register_type`].
    pub fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<TypeId> {
        self.types.register_type(descriptor)
    }

    /// Registers a converter between two registered types.
    ///
    /// # Errors
    ///
    /// Returns an error if either type is unknown.
    pub fn register_converter<F>(&mut self, from: &str, to: &str, converter: F) -> Result<()>
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.types.register_converter(from, to, converter)
    }

    /// Looks up a registered type.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown.
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.types.type_id(name)
    }

    /// Registers a single-pattern syntax element with a producer.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern does not compile, or if it is ambiguous
    /// under [`AmbiguityPolicy::Deny`].
    pub fn register_syntax<F>(
        &mut self,
        category: SyntaxCategory,
        pattern: &str,
        priority: i32,
        producer: F,
    ) -> Result<SyntaxId>
    where
        F: Fn(SyntaxNode, &mut ParseContext<'_>) -> ProduceResult + Send + Sync + 'static,
    {
        self.register(
            SyntaxSpec::new(category)
                .pattern(pattern)
                .priority(priority)
                .produce_with(producer),
        )
    }

    /// Registers an expression with its return type and the default producer.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile, the return type is
    /// unknown, or the registration is ambiguous under
    /// [`AmbiguityPolicy::Deny`].
    pub fn register_expression(
        &mut self,
        patterns: &[&str],
        return_type: &str,
        priority: i32,
    ) -> Result<SyntaxId> {
        self.register(
            SyntaxSpec::new(SyntaxCategory::Expression)
                .patterns(patterns.iter().copied())
                .returns(return_type)
                .priority(priority),
        )
    }

    /// Registers a syntax element.
    ///
    /// Conditions without an explicit return type return `boolean` when that
    /// type is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern does not compile, the return type is
    /// unknown, an expression lacks a return type, or the registration is
    /// ambiguous under [`AmbiguityPolicy::Deny`].
    pub fn register(&mut self, spec: SyntaxSpec) -> Result<SyntaxId> {
        if spec.patterns.is_empty() {
            return Err(Error::config("syntax registered without a pattern"));
        }
        let patterns = spec
            .patterns
            .iter()
            .map(|p| Pattern::compile(p, &self.types))
            .collect::<Result<Vec<_>>>()?;

        let return_type = match (&spec.return_type, spec.category) {
            (Some(name), _) => Some(
                self.types
                    .resolve(name)
                    .ok_or_else(|| Error::unknown_type(name.clone()))?,
            ),
            (None, SyntaxCategory::Condition) => self.types.resolve("boolean"),
            (None, SyntaxCategory::Expression) => {
                return Err(Error::config(format!(
                    "expression '{}' has no return type",
                    spec.patterns[0]
                )));
            }
            (None, _) => None,
        };

        for pattern in &patterns {
            self.check_ambiguity(spec.category, spec.priority, pattern)?;
        }

        let index = u32::try_from(self.definitions.len())
            .map_err(|_| Error::config("too many syntax definitions"))?;
        let id = SyntaxId(index);
        let name: Arc<str> = spec
            .name
            .unwrap_or_else(|| spec.patterns[0].clone())
            .into();
        tracing::debug!(
            category = %spec.category,
            name = %name,
            priority = spec.priority,
            patterns = patterns.len(),
            "registered syntax"
        );
        self.definitions.push(SyntaxDefinition {
            id,
            name,
            category: spec.category,
            patterns,
            priority: spec.priority,
            return_type,
            producer: spec.producer,
        });
        Ok(id)
    }

    /// Registers a value that the lines inside `owner` can refer to.
    ///
    /// # Errors
    ///
    /// Returns an error if `owner` is not a registered event or section, the
    /// pattern does not compile or has placeholders, or the type is unknown.
    pub fn register_context_value(
        &mut self,
        owner: SyntaxId,
        spec: ContextValueSpec,
    ) -> Result<()> {
        let opens_block = self
            .definitions
            .get(owner.0 as usize)
            .is_some_and(|d| d.category.opens_block());
        if !opens_block {
            return Err(Error::config(format!(
                "context value '{}' needs an event or section",
                spec.pattern
            )));
        }
        let pattern = Pattern::compile(&spec.pattern, &self.types)?;
        if !pattern.placeholders().is_empty() {
            return Err(Error::config(format!(
                "context value '{}' cannot have placeholders",
                spec.pattern
            )));
        }
        let return_type = self
            .types
            .resolve(&spec.return_type)
            .ok_or_else(|| Error::unknown_type(spec.return_type.clone()))?;
        tracing::debug!(
            owner = owner.0,
            pattern = pattern.source(),
            state = %spec.state,
            "registered context value"
        );
        self.context_values.push(ContextValue {
            owner,
            pattern,
            return_type,
            state: spec.state,
            usage: spec.usage,
        });
        Ok(())
    }

    fn check_ambiguity(
        &mut self,
        category: SyntaxCategory,
        priority: i32,
        pattern: &Pattern,
    ) -> Result<()> {
        let existing = self
            .definitions
            .iter()
            .filter(|d| d.category == category && d.priority == priority)
            .flat_map(|d| d.patterns.iter())
            .find(|p| p.normalized() == pattern.normalized());
        let Some(existing) = existing else {
            return Ok(());
        };
        match self.config.ambiguity {
            AmbiguityPolicy::Deny => Err(Error::ambiguous_match(
                category.as_str(),
                pattern.source(),
                existing.source(),
            )),
            AmbiguityPolicy::Warn => {
                tracing::warn!(
                    category = %category,
                    pattern = pattern.source(),
                    existing = existing.source(),
                    "ambiguous syntax registration; the earlier one wins"
                );
                self.ambiguities.push(Ambiguity {
                    category,
                    pattern: pattern.source().to_string(),
                    existing: existing.source().to_string(),
                    priority,
                });
                Ok(())
            }
        }
    }

    /// Freezes the registration.
    #[must_use]
    pub fn build(self) -> Registry {
        let types = self.types.build();
        let mut order: [Vec<Candidate>; 5] = Default::default();
        for def in &self.definitions {
            for (pattern, _) in def.patterns.iter().enumerate() {
                order[def.category.slot()].push(Candidate {
                    syntax: def.id,
                    pattern,
                });
            }
        }
        let definitions = self.definitions;
        for list in &mut order {
            // Stable sort keeps registration order among equals.
            list.sort_by(|a, b| {
                let da = &definitions[a.syntax.0 as usize];
                let db = &definitions[b.syntax.0 as usize];
                db.priority.cmp(&da.priority).then_with(|| {
                    db.patterns[b.pattern]
                        .specificity()
                        .cmp(&da.patterns[a.pattern].specificity())
                })
            });
        }
        tracing::debug!(
            definitions = definitions.len(),
            ambiguities = self.ambiguities.len(),
            "registry built"
        );
        Registry {
            types,
            definitions,
            order,
            context_values: self.context_values,
            ambiguities: self.ambiguities,
            config: self.config,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Frozen registry
// =============================================================================

/// Immutable syntax and type registry. `Send + Sync`.
pub struct Registry {
    types: TypeSystem,
    definitions: Vec<SyntaxDefinition>,
    order: [Vec<Candidate>; 5],
    context_values: Vec<ContextValue>,
    ambiguities: Vec<Ambiguity>,
    config: ParserConfig,
}

impl Registry {
    /// The type system.
    #[must_use]
    pub fn types(&self) -> &TypeSystem {
        &self.types
    }

    /// The configuration the registry was built with.
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns a definition by id.
    #[must_use]
    pub fn definition(&self, id: SyntaxId) -> Option<&SyntaxDefinition> {
        self.definitions.get(id.0 as usize)
    }

    /// All definitions in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[SyntaxDefinition] {
        &self.definitions
    }

    /// Candidates of a category in matching order: priority descending, then
    /// specificity descending, then registration order.
    #[must_use]
    pub fn candidates(&self, category: SyntaxCategory) -> &[Candidate] {
        &self.order[category.slot()]
    }

    /// Context values provided by an event or section, in registration
    /// order.
    pub fn context_values(&self, owner: SyntaxId) -> impl Iterator<Item = &ContextValue> {
        self.context_values.iter().filter(move |v| v.owner == owner)
    }

    /// Ambiguities recorded under [`AmbiguityPolicy::Warn`].
    #[must_use]
    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types)
            .field("definitions", &self.definitions.len())
            .field("context_values", &self.context_values.len())
            .field("ambiguities", &self.ambiguities.len())
            .finish_non_exhaustive()
    }
}
