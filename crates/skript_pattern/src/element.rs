//! Pattern element tree.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use regex::Regex;
use skript_foundation::PatternType;

/// One node of a compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatternElement {
    /// Literal text, lowercased with whitespace collapsed to single spaces.
    Literal(String),
    /// Whitespace between two elements: the input must not continue a word
    /// across it.
    Space,
    /// `[ ... ]`: may be skipped.
    Optional(Box<PatternElement>),
    /// `( a | b )`: branches tried in declared order.
    Choice(Vec<ChoiceBranch>),
    /// `%type%`: satisfied by a sub-expression.
    Placeholder(usize),
    /// `<regex>`: satisfied by text the regex matches entirely.
    Regex(usize),
    /// Elements matched one after another.
    Sequence(Vec<PatternElement>),
}

impl PatternElement {
    /// Number of literal words that must appear for this element to match.
    #[must_use]
    pub fn required_words(&self) -> usize {
        match self {
            Self::Literal(text) => text.split_whitespace().count(),
            Self::Sequence(items) => items.iter().map(Self::required_words).sum(),
            Self::Space
            | Self::Optional(_)
            | Self::Choice(_)
            | Self::Placeholder(_)
            | Self::Regex(_) => 0,
        }
    }

    /// Returns true if this element may match without consuming anything.
    #[must_use]
    pub fn can_be_empty(&self) -> bool {
        match self {
            Self::Literal(text) => text.is_empty(),
            Self::Space | Self::Optional(_) => true,
            Self::Choice(branches) => branches.iter().any(|b| b.element.can_be_empty()),
            Self::Placeholder(_) | Self::Regex(_) => false,
            Self::Sequence(items) => items.iter().all(Self::can_be_empty),
        }
    }
}

/// One branch of a choice, with its optional parse mark or tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChoiceBranch {
    /// Parse mark written as `N:` or `N¦` before the branch.
    pub mark: Option<i64>,
    /// Parse tag written as `name:` before the branch.
    pub tag: Option<String>,
    /// Branch content.
    pub element: PatternElement,
}

/// Which kinds of expression a placeholder accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Acceptance {
    /// Literals, variables and syntax expressions.
    #[default]
    All,
    /// `*`: literals only.
    LiteralsOnly,
    /// `~`: variables and syntax expressions only.
    NonLiterals,
}

/// A typed slot in a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placeholder {
    /// Position among the pattern's placeholders.
    pub index: usize,
    /// Acceptable types, in declared order.
    pub types: Vec<PatternType>,
    /// `-`: the slot may be left empty.
    pub nullable: bool,
    /// `*` / `~` restriction.
    pub acceptance: Acceptance,
    /// `=`: condition syntax may satisfy the slot.
    pub conditions: bool,
    /// Byte offset of the opening `%` in the pattern source.
    pub offset: usize,
    /// The placeholder as written, `%` signs included.
    pub text: String,
}

impl Placeholder {
    /// Returns true if exactly one value is expected.
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.types.iter().all(|t| t.single)
    }
}

/// A compiled `<regex>` element.
///
/// The regex is anchored at both ends, so it has to match the whole span it
/// is tried on.
#[derive(Clone, Debug)]
pub struct RegexElement {
    source: String,
    regex: Regex,
}

impl RegexElement {
    pub(crate) fn new(source: String, regex: Regex) -> Self {
        Self { source, regex }
    }

    /// The regex as written between the angle brackets.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the regex matches all of `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for RegexElement {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RegexElement {}
