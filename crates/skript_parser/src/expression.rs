//! Parsing a span of a line as a typed expression.
//!
//! Forms are tried in a fixed order: parentheses, variables, quoted strings,
//! literals, lists (for plural targets), then expression and condition
//! syntax.

use skript_foundation::{PatternType, Result, TypeId, Value};
use skript_pattern::text::{is_boundary, is_word_char, match_literal, skip_whitespace};
use skript_pattern::{Acceptance, Placeholder};
use skript_types::{TypeLookup, TypeSystem};

use crate::context::ParseContext;
use crate::matcher::Outcome;
use crate::node::{Conjunction, Expr, ExprKind, SyntaxCategory};
use crate::parser;
use crate::registry::SyntaxDefinition;

/// What a span has to parse into.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Target {
    pub types: Vec<PatternType>,
    pub single: bool,
    pub acceptance: Acceptance,
    pub conditions: bool,
}

impl Target {
    pub fn from_placeholder(placeholder: &Placeholder) -> Self {
        Self {
            types: placeholder.types.clone(),
            single: placeholder.is_single(),
            acceptance: placeholder.acceptance,
            conditions: placeholder.conditions,
        }
    }

    pub fn from_types(types: &[PatternType]) -> Self {
        Self {
            types: types.to_vec(),
            single: types.iter().all(|t| t.single),
            acceptance: Acceptance::All,
            conditions: true,
        }
    }

    fn element(&self) -> Self {
        Self {
            types: self.types.iter().map(|t| t.with_single(true)).collect(),
            single: true,
            ..self.clone()
        }
    }

    fn describe(&self, types: &TypeSystem) -> String {
        let names: Vec<&str> = self
            .types
            .iter()
            .map(|t| types.pattern_type_name(t.with_single(self.single)))
            .collect();
        match names.as_slice() {
            [] => "nothing".to_string(),
            [one] if self.single => format!("a valid {one}"),
            [one] => format!("valid {one}"),
            many => format!("one of {}", many.join("/")),
        }
    }
}

pub(crate) fn parse_slot(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    placeholder: &Placeholder,
) -> Result<Outcome<Expr>> {
    parse(ctx, line, start, end, &Target::from_placeholder(placeholder))
}

/// Parses `line[start..end]` for `target`.
///
/// Rejections are remembered for the rest of the line, unless a candidate
/// was skipped because it is already being tried on the same span.
///
/// # Errors
///
/// Only fatal errors (recursion limit, cancellation) are returned as `Err`;
/// anything else is an [`Outcome::Rejected`].
pub(crate) fn parse(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    target: &Target,
) -> Result<Outcome<Expr>> {
    let start = skip_whitespace(&line[..end], start);
    let end = start + line[start..end].trim_end().len();
    let cacheable = !ctx.is_span_active(start, end);
    if cacheable {
        if let Some(reason) = ctx.rejection(start, end, target) {
            return Ok(Outcome::Rejected(reason.to_string()));
        }
    }

    ctx.enter()?;
    let outcome = parse_inner(ctx, line, start, end, target);
    ctx.leave();

    if cacheable {
        if let Ok(Outcome::Rejected(reason)) = &outcome {
            ctx.reject(start, end, target, reason);
        }
    }
    outcome
}

fn parse_inner(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    target: &Target,
) -> Result<Outcome<Expr>> {
    let start = skip_whitespace(&line[..end], start);
    let end = start + line[start..end].trim_end().len();
    let text = &line[start..end];
    let types = ctx.registry().types();
    if text.is_empty() {
        return Ok(Outcome::Rejected(format!("expected {}", target.describe(types))));
    }

    if text.starts_with('(') && closing(text, 0, '(', ')') == Some(text.len() - 1) {
        if let Outcome::Matched(expr) = parse(ctx, line, start + 1, end - 1, target)? {
            return Ok(Outcome::Matched(expr));
        }
    }

    if text.starts_with('{') && closing(text, 0, '{', '}') == Some(text.len() - 1) {
        return Ok(variable(ctx, &text[1..text.len() - 1], start, end, target));
    }

    if target.acceptance != Acceptance::NonLiterals {
        if let Some(value) = quoted_string(text) {
            if let Some(string) = types.resolve("string") {
                let span = ctx.span(start, end);
                if let Some((value, ty)) = coerce_value(types, value, string.ty, target) {
                    return Ok(Outcome::Matched(Expr::new(ExprKind::Literal(value), ty, span)));
                }
            }
        } else if let Some((value, ty)) = literal(types, text, target) {
            return Ok(Outcome::Matched(Expr::new(
                ExprKind::Literal(value),
                ty,
                ctx.span(start, end),
            )));
        }
    }

    if !target.single {
        if let Some(expr) = list(ctx, line, start, end, target)? {
            return Ok(Outcome::Matched(expr));
        }
    }

    let mut near = Vec::new();
    if target.acceptance != Acceptance::LiteralsOnly {
        let mut categories = vec![SyntaxCategory::Expression];
        if target.conditions {
            categories.push(SyntaxCategory::Condition);
        }
        for category in categories {
            let accept = |def: &SyntaxDefinition| returns_compatible(types, def, target);
            if let Some(node) =
                parser::match_category(ctx, line, start, end, category, accept, &mut near)?
            {
                let Some(ret) = node.return_type else {
                    continue;
                };
                if target.single && !ret.single {
                    continue;
                }
                let span = node.span;
                let expr = Expr::new(ExprKind::Syntax(Box::new(node)), ret, span);
                if let Some(expr) = coerce_expr(types, expr, target) {
                    return Ok(Outcome::Matched(expr));
                }
            }
        }
    }

    // Prefer a producer's rejection to the type mismatch.
    if let Some(miss) = near.iter().find(|m| m.produced && !m.reason.is_empty()) {
        return Ok(Outcome::Rejected(miss.reason.clone()));
    }
    Ok(Outcome::Rejected(format!(
        "'{text}' is not {}",
        target.describe(types)
    )))
}

// =============================================================================
// Forms
// =============================================================================

fn variable(
    ctx: &mut ParseContext<'_>,
    name: &str,
    start: usize,
    end: usize,
    target: &Target,
) -> Outcome<Expr> {
    let name = name.trim();
    if target.acceptance == Acceptance::LiteralsOnly {
        return Outcome::Rejected(format!("expected a literal, found variable {{{name}}}"));
    }
    if name.is_empty() {
        return Outcome::Rejected("empty variable name".to_string());
    }
    let is_list = name.ends_with("::*");
    if is_list && target.single {
        return Outcome::Rejected(format!("list variable {{{name}}} where one value is expected"));
    }
    let Some(first) = target.types.first() else {
        return Outcome::Rejected("no acceptable type".to_string());
    };
    Outcome::Matched(Expr::new(
        ExprKind::Variable {
            name: name.to_string(),
            local: name.starts_with('_'),
        },
        PatternType {
            ty: first.ty,
            single: !is_list,
        },
        ctx.span(start, end),
    ))
}

/// Unquotes `"..."`, where `""` stands for one quote.
fn quoted_string(text: &str) -> Option<Value> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    if text.len() < 2 {
        return None;
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
            } else {
                return None;
            }
        }
        out.push(c);
    }
    Some(Value::from(out.as_str()))
}

/// Tries the literal parsers of the acceptable types, then literals of other
/// types that convert to one of them.
fn literal(types: &TypeSystem, text: &str, target: &Target) -> Option<(Value, PatternType)> {
    for t in &target.types {
        if let Ok((actual, value)) = types.parse_literal_typed(t.ty, text) {
            if let Some(found) = coerce_value(types, value, actual, target) {
                return Some(found);
            }
        }
    }
    for (id, desc) in types.types() {
        if !desc.has_literal_parser() || target.types.iter().all(|t| !types.can_convert(id, t.ty)) {
            continue;
        }
        if let Some(value) = desc.parse(text) {
            if let Some(found) = coerce_value(types, value, id, target) {
                return Some(found);
            }
        }
    }
    None
}

/// Parses a list of single elements. `None` when the text is not a list or
/// any element fails, so that expression syntax containing a separator
/// still gets its turn.
fn list(
    ctx: &mut ParseContext<'_>,
    line: &str,
    start: usize,
    end: usize,
    target: &Target,
) -> Result<Option<Expr>> {
    let separators = ctx.registry().config().list_separators.clone();
    let Some((items, conjunction)) = split_list(line, start, end, &separators) else {
        return Ok(None);
    };
    let element = target.element();
    let checkpoint = ctx.checkpoint();
    let mut exprs = Vec::with_capacity(items.len());
    for (s, e) in items {
        match parse(ctx, line, s, e, &element)? {
            Outcome::Matched(expr) => exprs.push(expr),
            Outcome::Rejected(_) => {
                ctx.rollback(checkpoint);
                return Ok(None);
            }
        }
    }
    let ty = match exprs.first() {
        Some(first) if exprs.iter().all(|x| x.ty.ty == first.ty.ty) => first.ty.ty,
        _ => match target.types.first() {
            Some(t) => t.ty,
            None => return Ok(None),
        },
    };
    Ok(Some(Expr::new(
        ExprKind::List {
            items: exprs,
            conjunction,
        },
        PatternType::plural(ty),
        ctx.span(start, end),
    )))
}

/// Splits `line[start..end]` on top-level separators. Returns `None` unless
/// there are at least two non-empty items.
pub(crate) fn split_list(
    line: &str,
    start: usize,
    end: usize,
    separators: &[String],
) -> Option<(Vec<(usize, usize)>, Conjunction)> {
    let mut items = Vec::new();
    let mut conjunction = Conjunction::And;
    let mut item_start = start;
    let mut quoted = false;
    let mut depth = 0usize;
    let mut skip_until = start;
    let region = &line[..end];

    for (offset, c) in line[start..end].char_indices() {
        let pos = start + offset;
        if pos < skip_until {
            continue;
        }
        match c {
            '"' => quoted = !quoted,
            '(' | '{' if !quoted => depth += 1,
            ')' | '}' if !quoted => depth = depth.saturating_sub(1),
            _ => {}
        }
        if quoted || depth > 0 || c == '"' {
            continue;
        }
        for sep in separators {
            let word = sep.chars().next().is_some_and(is_word_char);
            if word && (!is_boundary(region, pos) || pos == item_start) {
                continue;
            }
            let Some(after) = match_literal(region, pos, sep) else {
                continue;
            };
            if skip_whitespace(region, pos) != pos || (word && !is_boundary(region, after)) {
                continue;
            }
            if line[item_start..pos].trim().is_empty() {
                return None;
            }
            items.push((item_start, pos));
            if sep.eq_ignore_ascii_case("or") {
                conjunction = Conjunction::Or;
            }
            item_start = after;
            skip_until = after;
            break;
        }
    }
    if items.is_empty() || line[item_start..end].trim().is_empty() {
        return None;
    }
    items.push((item_start, end));
    Some((items, conjunction))
}

// =============================================================================
// Coercion
// =============================================================================

fn returns_compatible(types: &TypeSystem, def: &SyntaxDefinition, target: &Target) -> bool {
    let Some(ret) = def.return_type else {
        return false;
    };
    // The producer narrows a universal return type to the actual one.
    if types.is_universal(ret.ty) {
        return true;
    }
    if target.single && !ret.single {
        return false;
    }
    target.types.iter().any(|t| types.can_convert(ret.ty, t.ty))
}

/// Coerces a literal value of type `actual` eagerly.
fn coerce_value(
    types: &TypeSystem,
    value: Value,
    actual: TypeId,
    target: &Target,
) -> Option<(Value, PatternType)> {
    for t in &target.types {
        if types.is_assignable(actual, t.ty) {
            return Some((value, PatternType { ty: actual, single: target.single }));
        }
    }
    for t in &target.types {
        if let Ok(converted) = types.convert(&value, actual, t.ty) {
            return Some((converted, PatternType { ty: t.ty, single: target.single }));
        }
    }
    None
}

/// Coerces a syntax expression, wrapping it when converters are needed.
fn coerce_expr(types: &TypeSystem, expr: Expr, target: &Target) -> Option<Expr> {
    if target.types.iter().any(|t| types.is_assignable(expr.ty.ty, t.ty)) {
        return Some(expr);
    }
    let (t, path) = target
        .types
        .iter()
        .find_map(|t| types.conversion_path(expr.ty.ty, t.ty).map(|p| (t, p)))?;
    let span = expr.span;
    let single = expr.ty.single;
    Some(Expr::new(
        ExprKind::Converted {
            inner: Box::new(expr),
            path: path.steps.clone(),
        },
        PatternType { ty: t.ty, single },
        span,
    ))
}

/// Byte offset of the bracket closing the one at `open`, skipping quoted text.
pub(crate) fn closing(text: &str, open: usize, left: char, right: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in text[open..].char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == left && !quoted => depth += 1,
            c if c == right && !quoted => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
