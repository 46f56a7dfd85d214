//! Per-parse state.
//!
//! A [`ParseContext`] belongs to one top-level parse unit (a script or a
//! single line). It is never shared between threads and never persisted.

use std::collections::HashMap;
use std::sync::Arc;

use im::{HashSet, Vector};
use skript_foundation::{Diagnostic, Error, Result, Span};

use crate::cancel::CancellationToken;
use crate::expression::Target;
use crate::node::{SyntaxCategory, SyntaxId};
use crate::registry::Registry;

/// A rejected candidate and how far it got.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NearMiss {
    /// Category that was being parsed.
    pub category: SyntaxCategory,
    /// The definition.
    pub syntax: SyntaxId,
    /// Source of the pattern that was tried.
    pub pattern: String,
    /// Byte offset in the line up to which the candidate matched.
    pub progress: usize,
    /// Position of the candidate in registry order.
    pub rank: usize,
    /// Why the candidate was rejected.
    pub reason: String,
    /// The pattern matched and the producer turned the node down.
    pub produced: bool,
}

impl NearMiss {
    /// Picks the most plausible near-miss: furthest progress, then earliest
    /// in registry order.
    #[must_use]
    pub fn best(misses: &[Self]) -> Option<&Self> {
        misses
            .iter()
            .min_by(|a, b| b.progress.cmp(&a.progress).then(a.rank.cmp(&b.rank)))
    }

    /// Renders the near-miss for an error message.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("closest match '{}': {}", self.pattern, self.reason)
    }
}

/// Snapshot that [`ParseContext::rollback`] returns to.
#[derive(Clone, Debug)]
pub struct Checkpoint {
    diagnostics: usize,
    scopes: Vector<HashSet<Arc<str>>>,
}

/// Rejected `(start, end, target)` parses of the text being parsed.
pub(crate) struct Rejections(HashMap<(usize, usize, Target), String>);

/// Mutable state of one parse.
pub struct ParseContext<'r> {
    registry: &'r Registry,
    source: Option<String>,
    line: u32,
    column: u32,
    scopes: Vector<HashSet<Arc<str>>>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
    max_depth: usize,
    cancel: CancellationToken,
    active: Vec<(SyntaxId, usize, usize)>,
    near_misses: Vec<NearMiss>,
    enclosing: Vec<SyntaxId>,
    candidates_tried: usize,
    rejected: HashMap<(usize, usize, Target), String>,
}

impl<'r> ParseContext<'r> {
    /// Creates a context for parsing against `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            source: None,
            line: 1,
            column: 1,
            scopes: Vector::unit(HashSet::new()),
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: registry.config().max_depth,
            cancel: CancellationToken::new(),
            active: Vec::new(),
            near_misses: Vec::new(),
            enclosing: Vec::new(),
            candidates_tried: 0,
            rejected: HashMap::new(),
        }
    }

    /// Sets the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Sets the source label used in error context.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Overrides the recursion limit for this parse.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The registry being parsed against.
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// The source label, if any.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    // =========================================================================
    // Position
    // =========================================================================

    /// Sets the line and the column at which the current line's text starts.
    pub fn set_position(&mut self, line: u32, column: u32) {
        self.line = line;
        self.column = column;
    }

    /// Current line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column of the start of the current line's text.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Span of `start..end` in the current line.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::within_line(self.line, self.column, start, end)
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    /// Opens a nested scope.
    pub fn push_scope(&mut self) {
        self.scopes.push_back(HashSet::new());
    }

    /// Closes the innermost scope. The outermost scope is never closed.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop_back();
        }
    }

    /// Number of open scopes.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares a local name in the innermost scope.
    pub fn declare(&mut self, name: &str) {
        let key = normalize_name(name);
        if let Some(scope) = self.scopes.back_mut() {
            scope.insert(key);
        }
    }

    /// Returns true if a local name is visible.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.scopes.iter().any(|scope| scope.contains(&key))
    }

    /// Visible local names, outermost scope first, normalized to lowercase.
    pub fn declared(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.iter().map(|name| &**name))
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Appends a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Takes all diagnostics out of the context.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Near-misses of the last failed top-level parse.
    #[must_use]
    pub fn near_misses(&self) -> &[NearMiss] {
        &self.near_misses
    }

    pub(crate) fn set_near_misses(&mut self, misses: Vec<NearMiss>) {
        self.near_misses = misses;
    }

    // =========================================================================
    // Checkpoints
    // =========================================================================

    /// Captures diagnostics and declarations. O(1).
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            diagnostics: self.diagnostics.len(),
            scopes: self.scopes.clone(),
        }
    }

    /// Undoes everything reported or declared since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.diagnostics.truncate(checkpoint.diagnostics);
        self.scopes = checkpoint.scopes;
    }

    // =========================================================================
    // Recursion, cancellation, re-entry
    // =========================================================================

    /// The cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fails with [`skript_foundation::ErrorKind::Cancelled`] once cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns a cancellation error.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::cancelled())
        } else {
            Ok(())
        }
    }

    /// Enters one level of sub-parsing.
    ///
    /// # Errors
    ///
    /// Returns a cancellation error, or a recursion limit error when the
    /// depth would exceed the limit.
    pub fn enter(&mut self) -> Result<()> {
        self.check_cancelled()?;
        if self.depth >= self.max_depth {
            return Err(Error::recursion_limit(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of sub-parsing.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current sub-parse depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn is_active(&self, syntax: SyntaxId, start: usize, end: usize) -> bool {
        self.active.contains(&(syntax, start, end))
    }

    pub(crate) fn activate(&mut self, syntax: SyntaxId, start: usize, end: usize) {
        self.active.push((syntax, start, end));
    }

    pub(crate) fn deactivate(&mut self) {
        self.active.pop();
    }

    pub(crate) fn is_span_active(&self, start: usize, end: usize) -> bool {
        self.active.iter().any(|&(_, s, e)| s == start && e == end)
    }

    pub(crate) fn rejection(&self, start: usize, end: usize, target: &Target) -> Option<&str> {
        self.rejected
            .get(&(start, end, target.clone()))
            .map(String::as_str)
    }

    pub(crate) fn reject(&mut self, start: usize, end: usize, target: &Target, reason: &str) {
        self.rejected
            .insert((start, end, target.clone()), reason.to_string());
    }

    /// Starts an empty rejection cache, handing back the current one.
    /// Offsets are only meaningful within one text.
    pub(crate) fn take_rejections(&mut self) -> Rejections {
        Rejections(std::mem::take(&mut self.rejected))
    }

    pub(crate) fn restore_rejections(&mut self, saved: Rejections) {
        self.rejected = saved.0;
    }

    pub(crate) fn count_candidate(&mut self) {
        self.candidates_tried += 1;
    }

    /// Number of candidate patterns attempted so far, sub-parses included.
    #[must_use]
    pub fn candidates_tried(&self) -> usize {
        self.candidates_tried
    }

    // =========================================================================
    // Block structure
    // =========================================================================

    /// Definitions of the events and sections enclosing the current line,
    /// outermost first.
    #[must_use]
    pub fn enclosing(&self) -> &[SyntaxId] {
        &self.enclosing
    }

    pub(crate) fn enter_block(&mut self, owner: SyntaxId) {
        self.enclosing.push(owner);
        self.push_scope();
    }

    pub(crate) fn leave_block(&mut self) {
        self.enclosing.pop();
        self.pop_scope();
    }
}

fn normalize_name(name: &str) -> Arc<str> {
    name.trim().to_lowercase().into()
}
