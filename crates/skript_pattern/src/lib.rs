//! Syntax pattern compiler for the Skript parser.
//!
//! A pattern such as `give [the] %item% to %player%` compiles into a
//! [`Pattern`]: an element tree plus a linear match program with a
//! follow set for every placeholder.
//!
//! # Grammar
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `text` | literal, case-insensitive, whitespace-collapsed |
//! | `[a]` | optional |
//! | `(a\|b)` | choice, tried in order |
//! | `a\|b` | top-level choice |
//! | `N:a` / `N¦a` | parse mark on a branch, combined by XOR |
//! | `name:a` | parse tag on a branch, reported when the branch is taken |
//! | `<regex>` | text the regex matches entirely |
//! | `%type%` | placeholder; plural name for lists; `%a/b%` for several types |
//! | `%-type%` `%*type%` `%~type%` `%=type%` | nullable, literal-only, non-literal, conditions allowed |
//! | `\x` | escaped character |
//!
//! Whitespace between two elements means the input may not run one word
//! into the next there: `is prime` rejects `isprime`, while the glued
//! `load[ing]` accepts `loading`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod compile;
pub mod element;
pub mod program;
pub mod text;

use std::fmt;

use skript_foundation::Result;
use skript_types::TypeLookup;

pub use element::{Acceptance, ChoiceBranch, PatternElement, Placeholder, RegexElement};
pub use program::{FollowSet, Instr};

/// A compiled syntax pattern. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    normalized: String,
    root: PatternElement,
    placeholders: Vec<Placeholder>,
    regexes: Vec<RegexElement>,
    program: Vec<Instr>,
    specificity: usize,
}

impl Pattern {
    /// Compiles pattern text, resolving placeholder types through `types`.
    ///
    /// # Errors
    ///
    /// Returns [`skript_foundation::ErrorKind::PatternSyntax`] for unbalanced
    /// groups, empty groups or placeholders, unknown type names, invalid
    /// regexes and placeholders that directly touch each other.
    pub fn compile(source: &str, types: &dyn TypeLookup) -> Result<Self> {
        let parsed = compile::parse(source, types)?;
        let program = program::lower(&parsed.root);
        let specificity = parsed.root.required_words();
        Ok(Self {
            source: source.to_string(),
            normalized: text::normalize(source),
            root: parsed.root,
            placeholders: parsed.placeholders,
            regexes: parsed.regexes,
            program,
            specificity,
        })
    }

    /// The pattern text as registered.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lowercased, whitespace-collapsed source.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// The element tree.
    #[must_use]
    pub fn root(&self) -> &PatternElement {
        &self.root
    }

    /// Placeholders in pattern order.
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Regex elements in pattern order.
    #[must_use]
    pub fn regexes(&self) -> &[RegexElement] {
        &self.regexes
    }

    /// The match program.
    #[must_use]
    pub fn program(&self) -> &[Instr] {
        &self.program
    }

    /// Number of literal words in required position.
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.specificity
    }

    /// Renders what remains of the pattern from instruction `pc`, used in
    /// near-miss messages.
    #[must_use]
    pub fn remainder_from(&self, pc: usize) -> String {
        program::render_from(&self.program, &self.placeholders, &self.regexes, pc)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
