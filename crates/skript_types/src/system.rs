//! Type registration and the frozen type table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use skript_foundation::{Error, PatternType, Result, TypeId, Value};

use crate::convert::{self, ConversionPath, Converter, MAX_CONVERSION_DEPTH};
use crate::descriptor::TypeDescriptor;

/// Name resolution for pattern placeholders.
///
/// Implemented by both the builder (so patterns can be compiled while
/// registering) and the frozen [`TypeSystem`].
pub trait TypeLookup {
    /// Resolves a singular or plural type name (case-insensitive).
    ///
    /// A plural name yields a list-valued [`PatternType`].
    fn resolve(&self, name: &str) -> Option<PatternType>;

    /// Returns the singular name of a type.
    fn name_of(&self, id: TypeId) -> Option<&str>;
}

#[derive(Clone, Debug)]
struct TypeEntry {
    descriptor: TypeDescriptor,
    supertype: Option<TypeId>,
}

/// Index of names shared by the builder and the system.
#[derive(Clone, Debug, Default)]
struct TypeTable {
    entries: Vec<TypeEntry>,
    names: HashMap<String, PatternType>,
}

impl TypeTable {
    fn resolve(&self, name: &str) -> Option<PatternType> {
        self.names.get(&name.trim().to_lowercase()).copied()
    }

    fn entry(&self, id: TypeId) -> Option<&TypeEntry> {
        self.entries.get(id.index() as usize)
    }

    fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        if from == to {
            return true;
        }
        let Some(target) = self.entry(to) else {
            return false;
        };
        if target.descriptor.universal {
            return true;
        }
        let mut current = self.entry(from).and_then(|e| e.supertype);
        while let Some(sup) = current {
            if sup == to {
                return true;
            }
            current = self.entry(sup).and_then(|e| e.supertype);
        }
        false
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Mutable registration phase of the type system.
pub struct TypeSystemBuilder {
    table: TypeTable,
    converters: Vec<Converter>,
    max_conversion_depth: usize,
}

impl TypeSystemBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: TypeTable::default(),
            converters: Vec::new(),
            max_conversion_depth: MAX_CONVERSION_DEPTH,
        }
    }

    /// Sets the bound on converter chain length.
    #[must_use]
    pub fn with_max_conversion_depth(mut self, depth: usize) -> Self {
        self.max_conversion_depth = depth;
        self
    }

    /// Sets the bound on converter chain length in place.
    pub fn set_max_conversion_depth(&mut self, depth: usize) {
        self.max_conversion_depth = depth;
    }

    /// Registers a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the singular or plural name is taken, or if the
    /// supertype is not registered yet.
    pub fn register_type(&mut self, descriptor: TypeDescriptor) -> Result<TypeId> {
        let singular = descriptor.name.trim().to_lowercase();
        let plural = descriptor.plural.trim().to_lowercase();
        if singular.is_empty() {
            return Err(Error::config("type name must not be empty"));
        }
        for name in [&singular, &plural] {
            if self.table.names.contains_key(name) {
                return Err(Error::duplicate_type(name.clone()));
            }
        }
        let supertype = match &descriptor.supertype {
            Some(name) => Some(
                self.table
                    .resolve(name)
                    .ok_or_else(|| Error::unknown_type(name.clone()))?
                    .ty,
            ),
            None => None,
        };

        let index = u32::try_from(self.table.entries.len())
            .map_err(|_| Error::config("too many types registered"))?;
        let id = TypeId::from_index(index);
        self.table.names.insert(singular, PatternType::single(id));
        self.table.names.insert(plural, PatternType::plural(id));
        tracing::debug!(name = %descriptor.name, ?id, "registered type");
        self.table.entries.push(TypeEntry {
            descriptor,
            supertype,
        });
        Ok(id)
    }

    /// Registers a converter between two registered types.
    ///
    /// # Errors
    ///
    /// Returns an error if either type name is unknown.
    pub fn register_converter<F>(&mut self, from: &str, to: &str, func: F) -> Result<()>
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        let from_id = self.type_id(from)?;
        let to_id = self.type_id(to)?;
        tracing::debug!(from, to, "registered converter");
        self.converters.push(Converter {
            from: from_id,
            to: to_id,
            func: Arc::new(func),
        });
        Ok(())
    }

    /// Looks up a registered type by singular or plural name.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::UnknownType`] if it is not registered.
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.table
            .resolve(name)
            .map(|pt| pt.ty)
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Freezes the registration and resolves every conversion path.
    #[must_use]
    pub fn build(self) -> TypeSystem {
        let table = self.table;
        let paths = convert::all_paths(
            table.entries.len(),
            &self.converters,
            self.max_conversion_depth,
            |a, b| table.is_assignable(a, b),
        );
        tracing::debug!(
            types = table.entries.len(),
            converters = self.converters.len(),
            paths = paths.len(),
            "type system built"
        );
        TypeSystem {
            table,
            converters: self.converters,
            paths,
            max_conversion_depth: self.max_conversion_depth,
        }
    }
}

impl Default for TypeSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeLookup for TypeSystemBuilder {
    fn resolve(&self, name: &str) -> Option<PatternType> {
        self.table.resolve(name)
    }

    fn name_of(&self, id: TypeId) -> Option<&str> {
        self.table.entry(id).map(|e| e.descriptor.name.as_str())
    }
}

// =============================================================================
// Frozen system
// =============================================================================

/// Immutable type table, shareable across threads.
pub struct TypeSystem {
    table: TypeTable,
    converters: Vec<Converter>,
    paths: HashMap<(TypeId, TypeId), ConversionPath>,
    max_conversion_depth: usize,
}

impl TypeSystem {
    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Iterates types in registration order.
    pub fn types(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.table
            .entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| Some((TypeId::from_index(u32::try_from(i).ok()?), &e.descriptor)))
    }

    /// Returns the descriptor of a type.
    #[must_use]
    pub fn descriptor(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.table.entry(id).map(|e| &e.descriptor)
    }

    /// Looks up a type by singular or plural name.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::UnknownType`] if it is not registered.
    pub fn type_id(&self, name: &str) -> Result<TypeId> {
        self.table
            .resolve(name)
            .map(|pt| pt.ty)
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Singular name of a type, or `"?"` for foreign ids.
    #[must_use]
    pub fn name(&self, id: TypeId) -> &str {
        self.name_of(id).unwrap_or("?")
    }

    /// Name of a pattern type, plural when list-valued.
    #[must_use]
    pub fn pattern_type_name(&self, pt: PatternType) -> &str {
        match self.table.entry(pt.ty) {
            Some(e) if pt.single => e.descriptor.name.as_str(),
            Some(e) => e.descriptor.plural.as_str(),
            None => "?",
        }
    }

    /// Returns true if every type is assignable to `id`.
    #[must_use]
    pub fn is_universal(&self, id: TypeId) -> bool {
        self.table.entry(id).is_some_and(|e| e.descriptor.universal)
    }

    /// Direct supertype of a type.
    #[must_use]
    pub fn supertype(&self, id: TypeId) -> Option<TypeId> {
        self.table.entry(id).and_then(|e| e.supertype)
    }

    /// Returns true if a value of `from` may be used where `to` is expected:
    /// same type, a supertype, or a universal type.
    #[must_use]
    pub fn is_assignable(&self, from: TypeId, to: TypeId) -> bool {
        self.table.is_assignable(from, to)
    }

    /// Returns true if `from` is assignable or convertible to `to`.
    #[must_use]
    pub fn can_convert(&self, from: TypeId, to: TypeId) -> bool {
        self.is_assignable(from, to) || self.paths.contains_key(&(from, to))
    }

    /// The cached conversion path between two types, if one is needed and
    /// exists.
    #[must_use]
    pub fn conversion_path(&self, from: TypeId, to: TypeId) -> Option<&ConversionPath> {
        self.paths.get(&(from, to))
    }

    /// The bound used when paths were computed.
    #[must_use]
    pub fn max_conversion_depth(&self) -> usize {
        self.max_conversion_depth
    }

    /// Parses literal text as a value of `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::LiteralParse`] when the type's
    /// parser rejects the text or the type has none.
    pub fn parse_literal(&self, ty: TypeId, text: &str) -> Result<Value> {
        self.parse_literal_typed(ty, text).map(|(_, v)| v)
    }

    /// Parses literal text for `ty`, also reporting the type that produced
    /// the value.
    ///
    /// For a universal type every type's parser is tried in registration
    /// order and the first success wins.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::LiteralParse`] when no parser accepts the text.
    pub fn parse_literal_typed(&self, ty: TypeId, text: &str) -> Result<(TypeId, Value)> {
        let entry = self
            .table
            .entry(ty)
            .ok_or_else(|| Error::unknown_type(format!("{ty:?}")))?;
        if entry.descriptor.universal {
            for (id, desc) in self.types() {
                if desc.universal {
                    continue;
                }
                if let Some(value) = desc.parse(text) {
                    return Ok((id, value));
                }
            }
        } else if let Some(value) = entry.descriptor.parse(text) {
            return Ok((ty, value));
        }
        Err(Error::literal_parse(&entry.descriptor.name, text))
    }

    /// Converts a value from one type to another.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::NoConversion`] when no path exists within
    /// the depth bound or a converter on the path rejects this value.
    pub fn convert(&self, value: &Value, from: TypeId, to: TypeId) -> Result<Value> {
        if self.is_assignable(from, to) {
            return Ok(value.clone());
        }
        let fail = || Error::no_conversion(self.name(from), self.name(to));
        let path = self.paths.get(&(from, to)).ok_or_else(fail)?;
        let mut current = value.clone();
        for &idx in path.converters() {
            let conv = &self.converters[idx];
            current = (conv.func)(&current).ok_or_else(fail)?;
        }
        Ok(current)
    }

    /// Renders a value with the type's formatter.
    #[must_use]
    pub fn format_value(&self, ty: TypeId, value: &Value) -> String {
        match self.descriptor(ty) {
            Some(d) => d.format(value),
            None => value.to_string(),
        }
    }
}

impl TypeLookup for TypeSystem {
    fn resolve(&self, name: &str) -> Option<PatternType> {
        self.table.resolve(name)
    }

    fn name_of(&self, id: TypeId) -> Option<&str> {
        self.table.entry(id).map(|e| e.descriptor.name.as_str())
    }
}

impl fmt::Debug for TypeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSystem")
            .field(
                "types",
                &self.table.entries.iter().map(|e| &e.descriptor.name).collect::<Vec<_>>(),
            )
            .field("converters", &self.converters.len())
            .field("paths", &self.paths.len())
            .finish_non_exhaustive()
    }
}
