//! Line and expression entry points.
//!
//! A line is matched against every candidate of a category in registry
//! order; the first candidate whose pattern matches and whose producer
//! accepts the node wins. Rejected candidates leave near-misses behind so a
//! failed line can say what it came closest to.

use skript_foundation::{Diagnostic, DiagnosticCode, Error, ErrorContext, PatternType, Result};
use tracing::trace;

use crate::context::{NearMiss, ParseContext};
use crate::expression::{self, Target};
use crate::matcher::{self, Failure, Outcome};
use crate::node::{Expr, ExprKind, SyntaxCategory, SyntaxNode};
use crate::registry::SyntaxDefinition;

/// Parses one line of text as syntax of `category`.
///
/// Leading and trailing whitespace is ignored. On success, reads of local
/// variables that are not declared in any open scope are reported as
/// warnings on `ctx`.
///
/// # Errors
///
/// Returns [`skript_foundation::ErrorKind::NoMatch`] carrying the best
/// near-miss when no candidate matches, or a fatal recursion limit or
/// cancellation error.
pub fn parse_line(
    category: SyntaxCategory,
    text: &str,
    ctx: &mut ParseContext<'_>,
) -> Result<SyntaxNode> {
    ctx.set_near_misses(Vec::new());
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len().max(start);
    let mut near = Vec::new();

    let saved = ctx.take_rejections();
    let found = if start < end {
        match_category(ctx, text, start, end, category, |_| true, &mut near)
    } else {
        Ok(None)
    };
    ctx.restore_rejections(saved);

    match found {
        Ok(Some(node)) => {
            warn_unset_locals(ctx, &node);
            Ok(node)
        }
        Ok(None) => {
            let best = NearMiss::best(&near).map(NearMiss::describe);
            ctx.set_near_misses(near);
            Err(Error::no_match(category.as_str(), text.trim(), best)
                .with_context(position(ctx)))
        }
        Err(err) => Err(err.with_context(position(ctx))),
    }
}

/// Parses text as an expression producing one of `acceptable` types.
///
/// The expression is single-valued unless at least one acceptable type is
/// plural. Conditions are accepted wherever a boolean is.
///
/// # Errors
///
/// Returns [`skript_foundation::ErrorKind::NoMatch`] when the text is not a
/// valid expression of any acceptable type.
pub fn parse_expression(
    text: &str,
    acceptable: &[PatternType],
    ctx: &mut ParseContext<'_>,
) -> Result<Expr> {
    let target = Target::from_types(acceptable);
    let saved = ctx.take_rejections();
    let parsed = expression::parse(ctx, text, 0, text.len(), &target);
    ctx.restore_rejections(saved);
    match parsed {
        Ok(Outcome::Matched(expr)) => {
            warn_unset_expr(ctx, &expr);
            Ok(expr)
        }
        Ok(Outcome::Rejected(reason)) => Err(Error::no_match(
            SyntaxCategory::Expression.as_str(),
            text.trim(),
            Some(reason),
        )
        .with_context(position(ctx))),
        Err(err) => Err(err.with_context(position(ctx))),
    }
}

/// Tries every candidate of `category` that `accept` admits on
/// `line[start..end]`, in registry order.
pub(crate) fn match_category<F>(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    category: SyntaxCategory,
    accept: F,
    near: &mut Vec<NearMiss>,
) -> Result<Option<SyntaxNode>>
where
    F: Fn(&SyntaxDefinition) -> bool,
{
    let registry = ctx.registry();
    for (rank, candidate) in registry.candidates(category).iter().enumerate() {
        ctx.check_cancelled()?;
        let Some(def) = registry.definition(candidate.syntax) else {
            continue;
        };
        if !accept(def) || ctx.is_active(def.id, start, end) {
            continue;
        }
        ctx.count_candidate();
        let pattern = &def.patterns[candidate.pattern];
        trace!(
            category = %category,
            syntax = %def.name,
            pattern = pattern.source(),
            text = &line[start..end],
            "trying candidate"
        );
        match try_candidate(ctx, line, start, end, def, candidate.pattern)? {
            Ok(node) => return Ok(Some(node)),
            Err(failure) => near.push(NearMiss {
                category,
                syntax: def.id,
                pattern: pattern.source().to_string(),
                progress: failure.progress,
                rank,
                reason: failure.reason,
                produced: failure.produced,
            }),
        }
    }
    Ok(None)
}

fn try_candidate(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    def: &SyntaxDefinition,
    pattern_index: usize,
) -> Result<std::result::Result<SyntaxNode, Failure>> {
    let pattern = &def.patterns[pattern_index];
    let checkpoint = ctx.checkpoint();

    ctx.activate(def.id, start, end);
    let result = matcher::run(pattern, line, start, end, |placeholder, s, e| {
        expression::parse_slot(ctx, line, s, e, placeholder)
    });
    ctx.deactivate();

    let matched = match result {
        Ok(Ok(matched)) => matched,
        Ok(Err(failure)) => {
            ctx.rollback(checkpoint);
            return Ok(Err(failure));
        }
        Err(err) => {
            ctx.rollback(checkpoint);
            return Err(err);
        }
    };

    let node = SyntaxNode {
        category: def.category,
        syntax: def.id,
        name: def.name.clone(),
        pattern_index,
        parse_mark: matched.mark,
        span: ctx.span(start, end),
        arguments: matched.arguments,
        children: Vec::new(),
        return_type: def.return_type,
        matches: matched.matches,
        tags: matched.tags,
    };
    match def.produce(node, ctx) {
        Ok(node) => Ok(Ok(node)),
        Err(reason) => {
            ctx.rollback(checkpoint);
            Ok(Err(Failure {
                progress: end,
                reason,
                produced: true,
            }))
        }
    }
}

fn position(ctx: &ParseContext<'_>) -> ErrorContext {
    let context = ErrorContext::new().with_position(ctx.line() as usize, ctx.column() as usize);
    match ctx.source() {
        Some(source) => context.with_source(source),
        None => context,
    }
}

// =============================================================================
// Unset locals
// =============================================================================

fn warn_unset_locals(ctx: &mut ParseContext<'_>, node: &SyntaxNode) {
    for arg in node.arguments.iter().flatten() {
        warn_unset_expr(ctx, arg);
    }
}

fn warn_unset_expr(ctx: &mut ParseContext<'_>, expr: &Expr) {
    if !ctx.registry().config().warn_unset_locals {
        return;
    }
    match &expr.kind {
        ExprKind::Variable { name, local: true } => {
            if !ctx.is_declared(name) {
                ctx.report(Diagnostic::warning(
                    expr.span,
                    DiagnosticCode::UnsetVariable,
                    format!("local variable {{{name}}} is used before it is set"),
                ));
            }
        }
        ExprKind::List { items, .. } => {
            for item in items {
                warn_unset_expr(ctx, item);
            }
        }
        ExprKind::Syntax(node) => warn_unset_locals(ctx, node),
        ExprKind::Converted { inner, .. } => warn_unset_expr(ctx, inner),
        ExprKind::Literal(_) | ExprKind::Variable { .. } => {}
    }
}
