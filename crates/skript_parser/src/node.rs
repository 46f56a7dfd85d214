//! Syntax tree nodes.
//!
//! Nodes own their argument expressions and block children exclusively;
//! there is no sharing and there are no cycles.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use skript_foundation::{PatternType, Span, TypeId, Value};

/// The kinds of syntax the registry knows about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyntaxCategory {
    /// Trigger header, owns a block (`on script load:`).
    Event,
    /// Nested block header (`if ...:`).
    Section,
    /// Statement (`print ...`).
    Effect,
    /// Boolean check, usable as a statement or as a `%=boolean%` argument.
    Condition,
    /// Value-producing syntax.
    Expression,
}

impl SyntaxCategory {
    /// All categories, in registry slot order.
    pub const ALL: [Self; 5] = [
        Self::Event,
        Self::Section,
        Self::Effect,
        Self::Condition,
        Self::Expression,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Section => "section",
            Self::Effect => "effect",
            Self::Condition => "condition",
            Self::Expression => "expression",
        }
    }

    /// Returns true for categories whose lines end in `:` and own a block.
    #[must_use]
    pub const fn opens_block(self) -> bool {
        matches!(self, Self::Event | Self::Section)
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SyntaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a registered syntax definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntaxId(pub(crate) u32);

impl SyntaxId {
    /// Raw registration index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// A matched syntax element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyntaxNode {
    /// Category of the definition.
    pub category: SyntaxCategory,
    /// The definition that matched.
    pub syntax: SyntaxId,
    /// Name of the definition.
    pub name: Arc<str>,
    /// Which of the definition's patterns matched.
    pub pattern_index: usize,
    /// XOR of the marks of the branches taken.
    pub parse_mark: i64,
    /// Location of the matched text.
    pub span: Span,
    /// One entry per placeholder, `None` for an omitted nullable slot.
    pub arguments: Vec<Option<Expr>>,
    /// Block content for events and sections.
    pub children: Vec<SyntaxNode>,
    /// Declared return type for expressions and conditions.
    pub return_type: Option<PatternType>,
    /// Text captured by the pattern's regex elements, in order.
    pub matches: Vec<String>,
    /// Tags of the labelled branches taken.
    pub tags: Vec<String>,
}

impl SyntaxNode {
    /// Returns the argument for placeholder `index`, if present.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&Expr> {
        self.arguments.get(index).and_then(Option::as_ref)
    }

    /// Returns true if the branch labelled `tag` was taken.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true if this node owns a block.
    #[must_use]
    pub fn opens_block(&self) -> bool {
        self.category.opens_block()
    }

    /// Number of nodes in this subtree, argument sub-expressions included.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self
            .arguments
            .iter()
            .flatten()
            .map(Expr::size)
            .sum::<usize>()
            + self.children.iter().map(Self::size).sum::<usize>()
    }
}

/// How the items of a list are joined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Conjunction {
    /// `a, b and c`
    And,
    /// `a, b or c`
    Or,
}

/// A typed sub-expression filling a placeholder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    /// What the expression is.
    pub kind: ExprKind,
    /// Type it produces, after coercion.
    pub ty: PatternType,
    /// Location in the line.
    pub span: Span,
}

/// The shape of an expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    /// A fully known value.
    Literal(Value),
    /// Several expressions joined by a conjunction.
    List {
        /// The items.
        items: Vec<Expr>,
        /// How they are joined.
        conjunction: Conjunction,
    },
    /// A variable reference.
    Variable {
        /// Name between the braces.
        name: String,
        /// Whether the name starts with `_`.
        local: bool,
    },
    /// A nested expression or condition syntax.
    Syntax(Box<SyntaxNode>),
    /// A non-literal expression coerced through converters at run time.
    Converted {
        /// The original expression.
        inner: Box<Expr>,
        /// Types produced by each converter step.
        path: Vec<TypeId>,
    },
}

impl Expr {
    /// Creates an expression.
    #[must_use]
    pub fn new(kind: ExprKind, ty: PatternType, span: Span) -> Self {
        Self { kind, ty, span }
    }

    /// Returns the literal value, looking through nothing else.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the nested syntax node.
    #[must_use]
    pub fn as_syntax(&self) -> Option<&SyntaxNode> {
        match &self.kind {
            ExprKind::Syntax(node) => Some(node),
            _ => None,
        }
    }

    /// Returns true for literals and lists made only of literals.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match &self.kind {
            ExprKind::Literal(_) => true,
            ExprKind::List { items, .. } => items.iter().all(Self::is_literal),
            _ => false,
        }
    }

    /// Number of nodes in this expression.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.kind {
            ExprKind::Literal(_) | ExprKind::Variable { .. } => 1,
            ExprKind::List { items, .. } => 1 + items.iter().map(Self::size).sum::<usize>(),
            ExprKind::Syntax(node) => node.size(),
            ExprKind::Converted { inner, .. } => 1 + inner.size(),
        }
    }
}
