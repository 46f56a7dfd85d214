//! Whole-script parsing: comments, indentation and blocks.
//!
//! Lines ending in `:` open a block: an event at the top level, a section
//! when nested. Every other line is an effect, or failing that a condition.
//! A failing line becomes a diagnostic and parsing carries on.

use std::borrow::Cow;

use skript_foundation::{Diagnostic, DiagnosticCode, Error, ErrorKind, Result, Span};
use tracing::debug;

use crate::context::ParseContext;
use crate::node::{SyntaxCategory, SyntaxNode};
use crate::parser::parse_line;
use crate::registry::Registry;

/// Columns a tab counts for when measuring indentation.
pub const TAB_WIDTH: usize = 4;

/// Result of parsing a script.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptParse {
    /// Top-level nodes in source order, blocks nested as children.
    pub nodes: Vec<SyntaxNode>,
    /// Everything reported while parsing, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScriptParse {
    /// Returns true if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Parses a whole script with a fresh context.
///
/// # Errors
///
/// Only cancellation is returned as an error; everything else ends up in
/// [`ScriptParse::diagnostics`].
pub fn parse_script(registry: &Registry, source: &str) -> Result<ScriptParse> {
    parse_script_with(ParseContext::new(registry), source)
}

/// Parses a whole script with a prepared context, for example one carrying a
/// cancellation token or a source label.
///
/// # Errors
///
/// Returns [`ErrorKind::Cancelled`] when cancellation was requested. No
/// partial tree is returned.
pub fn parse_script_with(mut ctx: ParseContext<'_>, source: &str) -> Result<ScriptParse> {
    let mut builder = Blocks::default();

    for (index, raw) in source.lines().enumerate() {
        ctx.check_cancelled()?;
        let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let stripped = strip_comment(raw);
        let content = stripped.trim_end();
        if content.trim_start().is_empty() {
            continue;
        }
        let lead = content.len() - content.trim_start().len();
        let indent = indentation(&content[..lead]);
        let text = &content[lead..];
        let column = u32::try_from(lead + 1).unwrap_or(u32::MAX);
        ctx.set_position(number, column);
        let whole = ctx.span(0, text.len());

        builder.close_until(indent, &mut ctx);

        if let Some(expected) = builder.expected_indent(indent) {
            ctx.report(Diagnostic::error(
                whole,
                DiagnosticCode::Structure,
                format!("indentation error: expected {expected} columns, found {indent}"),
            ));
            continue;
        }

        if let Some(header) = text.strip_suffix(':') {
            let node = parse_header(&mut ctx, builder.is_top_level(), header)?;
            builder.open(indent, node, &mut ctx);
            continue;
        }

        if builder.is_top_level() && !ctx.registry().config().allow_top_level_statements {
            ctx.report(Diagnostic::error(
                whole,
                DiagnosticCode::Structure,
                "statements must be placed inside a trigger",
            ));
            continue;
        }
        if let Some(node) = parse_statement(&mut ctx, text)? {
            builder.push(node);
        }
    }

    builder.close_until(0, &mut ctx);
    let nodes = builder.finish();
    let diagnostics = ctx.take_diagnostics();
    debug!(
        nodes = nodes.len(),
        diagnostics = diagnostics.len(),
        candidates = ctx.candidates_tried(),
        "script parsed"
    );
    Ok(ScriptParse { nodes, diagnostics })
}

/// Parses a block header. Returns `None` after reporting a failure.
fn parse_header(
    ctx: &mut ParseContext<'_>,
    top_level: bool,
    text: &str,
) -> Result<Option<SyntaxNode>> {
    let first = if top_level {
        SyntaxCategory::Event
    } else {
        SyntaxCategory::Section
    };
    let err = match parse_line(first, text, ctx) {
        Ok(node) => return Ok(Some(node)),
        Err(err) => err,
    };
    check_fatal(&err)?;
    if top_level && ctx.registry().config().allow_top_level_statements {
        match parse_line(SyntaxCategory::Section, text, ctx) {
            Ok(node) => return Ok(Some(node)),
            Err(other) => check_fatal(&other)?,
        }
    }
    report(ctx, text, &err);
    Ok(None)
}

/// Parses a statement line as an effect, then as a condition.
fn parse_statement(ctx: &mut ParseContext<'_>, text: &str) -> Result<Option<SyntaxNode>> {
    let err = match parse_line(SyntaxCategory::Effect, text, ctx) {
        Ok(node) => return Ok(Some(node)),
        Err(err) => err,
    };
    check_fatal(&err)?;
    if matches!(err.kind, ErrorKind::RecursionLimit { .. }) {
        report(ctx, text, &err);
        return Ok(None);
    }
    match parse_line(SyntaxCategory::Condition, text, ctx) {
        Ok(node) => Ok(Some(node)),
        Err(other) => {
            check_fatal(&other)?;
            report(ctx, text, &err);
            Ok(None)
        }
    }
}

/// Cancellation aborts the script; everything else stays with its line.
fn check_fatal(err: &Error) -> Result<()> {
    if matches!(err.kind, ErrorKind::Cancelled) {
        Err(Error::cancelled())
    } else {
        Ok(())
    }
}

fn report(ctx: &mut ParseContext<'_>, text: &str, err: &Error) {
    let span = ctx.span(0, text.len());
    ctx.report(Diagnostic::from_error(span, err));
}

// =============================================================================
// Block structure
// =============================================================================

struct Frame {
    indent: usize,
    child_indent: Option<usize>,
    node: Option<SyntaxNode>,
    span: Span,
}

/// Stack of open blocks.
#[derive(Default)]
struct Blocks {
    frames: Vec<Frame>,
    nodes: Vec<SyntaxNode>,
}

impl Blocks {
    fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    /// Closes every block that a line at `indent` falls outside of.
    fn close_until(&mut self, indent: usize, ctx: &mut ParseContext<'_>) {
        while self.frames.last().is_some_and(|f| indent <= f.indent) {
            self.close(ctx);
        }
    }

    /// The indentation a line at `indent` should have had, if it is wrong.
    fn expected_indent(&mut self, indent: usize) -> Option<usize> {
        match self.frames.last_mut() {
            None => (indent != 0).then_some(0),
            Some(frame) => match frame.child_indent {
                None => {
                    frame.child_indent = Some(indent);
                    None
                }
                Some(expected) => (indent != expected).then_some(expected),
            },
        }
    }

    fn open(&mut self, indent: usize, node: Option<SyntaxNode>, ctx: &mut ParseContext<'_>) {
        match &node {
            Some(owner) => ctx.enter_block(owner.syntax),
            None => ctx.push_scope(),
        }
        self.frames.push(Frame {
            indent,
            child_indent: None,
            node,
            span: ctx.span(0, 0),
        });
    }

    fn push(&mut self, node: SyntaxNode) {
        match self.frames.last_mut() {
            Some(Frame { node: Some(owner), .. }) => owner.children.push(node),
            Some(Frame { node: None, .. }) => {}
            None => self.nodes.push(node),
        }
    }

    fn close(&mut self, ctx: &mut ParseContext<'_>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let Some(node) = frame.node else {
            ctx.pop_scope();
            return;
        };
        ctx.leave_block();
        if frame.child_indent.is_none() {
            ctx.report(Diagnostic::warning(
                frame.span,
                DiagnosticCode::Structure,
                format!("'{}' has an empty block", node.name),
            ));
        }
        self.push(node);
    }

    fn finish(self) -> Vec<SyntaxNode> {
        self.nodes
    }
}

// =============================================================================
// Line helpers
// =============================================================================

/// Removes a trailing comment. `#` starts a comment outside of quotes and
/// variable braces; `##` stands for a literal `#`.
#[must_use]
pub fn strip_comment(line: &str) -> Cow<'_, str> {
    if !line.contains('#') {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len());
    let mut quoted = false;
    let mut braces = 0usize;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted = !quoted,
            '{' if !quoted => braces += 1,
            '}' if !quoted => braces = braces.saturating_sub(1),
            '#' if !quoted && braces == 0 => {
                if chars.peek() == Some(&'#') {
                    chars.next();
                } else {
                    break;
                }
            }
            _ => {}
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Width of leading whitespace, tabs counting as [`TAB_WIDTH`].
#[must_use]
pub fn indentation(lead: &str) -> usize {
    lead.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}
