//! Type handles used throughout parsing.
//!
//! The type table itself lives in `skript_types`; this module only defines
//! the cheap, copyable identifiers that values and nodes carry around.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to a registered type.
///
/// Indices are assigned in registration order, so a lower index means the
/// type was registered earlier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a type id from a raw registration index.
    #[must_use]
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this type.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A type together with a cardinality, as written in a placeholder.
///
/// `%number%` is `PatternType { single: true, .. }`, `%numbers%` is the
/// plural (list-valued) form.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatternType {
    /// The type.
    pub ty: TypeId,
    /// Whether exactly one value is expected.
    pub single: bool,
}

impl PatternType {
    /// A single-valued pattern type.
    #[must_use]
    pub const fn single(ty: TypeId) -> Self {
        Self { ty, single: true }
    }

    /// A list-valued pattern type.
    #[must_use]
    pub const fn plural(ty: TypeId) -> Self {
        Self { ty, single: false }
    }

    /// Returns the same type with the given cardinality.
    #[must_use]
    pub const fn with_single(self, single: bool) -> Self {
        Self {
            ty: self.ty,
            single,
        }
    }
}
