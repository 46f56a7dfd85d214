//! Rendering of syntax trees and diagnostics.

use std::fmt::Write as _;

use serde::Serialize;
use skript_foundation::{Diagnostic, Error, ErrorKind, Result, Severity, Value};
use skript_parser::{Conjunction, Expr, ExprKind, Registry, ScriptParse, SyntaxNode};

// =============================================================================
// Trees
// =============================================================================

/// Renders a node and everything below it, one element per line.
///
/// ```text
/// event 'periodical' every %*duration% @1:1
///   0: 5 seconds : duration
///   effect 'print' print %objects% @2:5
///     0: "tick" : strings
/// ```
#[must_use]
pub fn render_tree(node: &SyntaxNode, registry: &Registry) -> String {
    let mut out = String::new();
    write_node(&mut out, node, registry, 0, "");
    out
}

/// Renders a standalone expression in the same layout as [`render_tree`].
#[must_use]
pub fn render_expr(expr: &Expr, registry: &Registry) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, registry, 0, "");
    out
}

fn indent(out: &mut String, depth: usize, prefix: &str) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(prefix);
}

fn write_node(out: &mut String, node: &SyntaxNode, registry: &Registry, depth: usize, prefix: &str) {
    indent(out, depth, prefix);
    let pattern = registry
        .definition(node.syntax)
        .and_then(|def| def.patterns.get(node.pattern_index))
        .map_or("?", |p| p.source());
    let _ = write!(out, "{} '{}' {pattern}", node.category, node.name);
    if node.parse_mark != 0 {
        let _ = write!(out, " mark={}", node.parse_mark);
    }
    if !node.tags.is_empty() {
        let _ = write!(out, " tags={}", node.tags.join(","));
    }
    for text in &node.matches {
        let _ = write!(out, " <{text}>");
    }
    if let Some(ty) = node.return_type {
        let _ = write!(out, " -> {}", registry.types().pattern_type_name(ty));
    }
    let _ = writeln!(out, " @{}:{}", node.span.line, node.span.column);

    for (index, argument) in node.arguments.iter().enumerate() {
        let slot = format!("{index}: ");
        match argument {
            Some(expr) => write_expr(out, expr, registry, depth + 1, &slot),
            None => {
                indent(out, depth + 1, &slot);
                out.push_str("<none>\n");
            }
        }
    }
    for child in &node.children {
        write_node(out, child, registry, depth + 1, "");
    }
}

fn write_expr(out: &mut String, expr: &Expr, registry: &Registry, depth: usize, prefix: &str) {
    let types = registry.types();
    let ty = types.pattern_type_name(expr.ty);
    if let ExprKind::Syntax(node) = &expr.kind {
        write_node(out, node, registry, depth, prefix);
        return;
    }
    indent(out, depth, prefix);
    match &expr.kind {
        ExprKind::Literal(value @ Value::String(_)) => {
            let _ = writeln!(out, "{value} : {ty}");
        }
        ExprKind::Literal(value) => {
            let _ = writeln!(out, "{} : {ty}", types.format_value(expr.ty.ty, value));
        }
        ExprKind::Variable { name, .. } => {
            let _ = writeln!(out, "{{{name}}} : {ty}");
        }
        ExprKind::List { items, conjunction } => {
            let joiner = match conjunction {
                Conjunction::And => "and",
                Conjunction::Or => "or",
            };
            let _ = writeln!(out, "list ({joiner}) : {ty}");
            for item in items {
                write_expr(out, item, registry, depth + 1, "");
            }
        }
        ExprKind::Converted { inner, path } => {
            let steps: Vec<&str> = path.iter().map(|&id| types.name(id)).collect();
            let _ = writeln!(out, "converted via {} : {ty}", steps.join(" -> "));
            write_expr(out, inner, registry, depth + 1, "");
        }
        ExprKind::Syntax(_) => {}
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Human-readable diagnostic output with optional ANSI colors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(colors: bool) -> Self {
        Self { colors }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.colors {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn severity(&self, severity: Severity) -> String {
        let code = match severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Info => "1;36",
        };
        self.paint(code, &severity.to_string())
    }

    /// Renders one diagnostic with the offending source line underlined.
    ///
    /// ```text
    /// error[no-match]: can't understand this effect: 'give sword'
    ///   --> test.sk:2:1
    ///    |
    ///  2 | give sword
    ///    | ^^^^^^^^^^
    /// ```
    #[must_use]
    pub fn diagnostic(&self, name: &str, source: &str, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}{}: {}",
            self.severity(diagnostic.severity),
            self.paint("1", &format!("[{}]", diagnostic.code.as_str())),
            diagnostic.message
        );
        let _ = writeln!(
            out,
            "  {} {name}:{}:{}",
            self.paint("1;34", "-->"),
            diagnostic.line,
            diagnostic.column
        );

        let line_text = (diagnostic.line as usize)
            .checked_sub(1)
            .and_then(|index| source.lines().nth(index));
        if let Some(text) = line_text {
            let number = diagnostic.line.to_string();
            let gutter = " ".repeat(number.len());
            let bar = self.paint("1;34", "|");
            let start = (diagnostic.column as usize).saturating_sub(1);
            let width = text.trim_end().chars().count().saturating_sub(start).max(1);
            let _ = writeln!(out, " {gutter} {bar}");
            let _ = writeln!(out, " {} {bar} {text}", self.paint("1;34", &number));
            let marker = self.paint(
                if diagnostic.is_error() { "1;31" } else { "1;33" },
                &"^".repeat(width),
            );
            let _ = writeln!(out, " {gutter} {bar} {}{marker}", " ".repeat(start));
        }
        out
    }

    /// Renders every diagnostic of a parse, followed by a summary line when
    /// there is anything to report.
    #[must_use]
    pub fn report(&self, name: &str, source: &str, parse: &ScriptParse) -> String {
        let mut out = String::new();
        for diagnostic in &parse.diagnostics {
            out.push_str(&self.diagnostic(name, source, diagnostic));
            out.push('\n');
        }
        let errors = parse.errors().count();
        let warnings = parse
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        out.push_str(&self.summary(name, errors, warnings));
        out
    }

    /// One-line count of errors and warnings, empty when both are zero.
    #[must_use]
    pub fn summary(&self, name: &str, errors: usize, warnings: usize) -> String {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        match (errors, warnings) {
            (0, 0) => String::new(),
            (0, w) => format!(
                "{}: {name}: {w} warning{}\n",
                self.severity(Severity::Warning),
                plural(w)
            ),
            (e, 0) => format!(
                "{}: {name}: {e} error{}\n",
                self.severity(Severity::Error),
                plural(e)
            ),
            (e, w) => format!(
                "{}: {name}: {e} error{} and {w} warning{}\n",
                self.severity(Severity::Error),
                plural(e),
                plural(w)
            ),
        }
    }
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    file: &'a str,
    errors: usize,
    warnings: usize,
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<&'a [SyntaxNode]>,
}

/// Serializes the diagnostics of a parse, and its trees when `with_tree` is
/// set, as one JSON object.
///
/// # Errors
///
/// Returns an internal error if serialization fails.
pub fn report_json(name: &str, parse: &ScriptParse, with_tree: bool) -> Result<String> {
    let report = JsonReport {
        file: name,
        errors: parse.errors().count(),
        warnings: parse
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count(),
        diagnostics: &parse.diagnostics,
        nodes: with_tree.then_some(parse.nodes.as_slice()),
    };
    serde_json::to_string_pretty(&report).map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))
}
