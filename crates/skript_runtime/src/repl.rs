//! The interactive REPL.
//!
//! Each entry is parsed, never executed. A single line is parsed as an
//! effect or a condition; a block header followed by indented lines and a
//! blank line is parsed as a script. Commands start with `:`.

use std::collections::BTreeSet;
use std::io::{self, Write};

use skript_foundation::{Error, ErrorKind, PatternType, Result};
use skript_parser::script::strip_comment;
use skript_parser::{
    ParseContext, Registry, SyntaxCategory, SyntaxNode, parse_expression, parse_line,
    parse_script_with,
};
use skript_types::TypeLookup;
use tracing::debug;

use crate::editor::{LineEditor, ReadResult, RustylineEditor, is_complete};
use crate::render::{Renderer, render_expr, render_tree};

const SOURCE: &str = "<repl>";

/// Commands understood by the REPL.
pub const COMMANDS: [&str; 6] = [":expr", ":tree", ":types", ":syntax", ":help", ":quit"];

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Syntax everything is parsed against.
    registry: Registry,

    /// Local variables set by earlier entries.
    locals: BTreeSet<String>,

    /// Whether to print full trees or one-line summaries.
    show_tree: bool,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Diagnostic renderer.
    renderer: Renderer,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for block input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(registry: Registry) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, registry))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(mut editor: E, registry: Registry) -> Self {
        editor.set_keywords(keywords(&registry));
        Self {
            editor,
            registry,
            locals: BTreeSet::new(),
            show_tree: true,
            show_banner: true,
            renderer: Renderer::new(true),
            prompt: "sk> ".to_string(),
            continuation_prompt: "..> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Chooses between full trees and one-line summaries.
    #[must_use]
    pub const fn with_tree(mut self, show: bool) -> Self {
        self.show_tree = show;
        self
    }

    /// Enables or disables ANSI colors in diagnostics.
    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.renderer = Renderer::new(colors);
        self
    }

    /// The registry entries are parsed against.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Local variables set so far, lowercase.
    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.locals.iter().map(String::as_str)
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.print_error(&e);
                }
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        if matches!(trimmed, ":quit" | ":q" | ":exit") {
            return Ok(false);
        }

        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(output) => print!("{output}"),
            Err(e) => self.print_error(&e),
        }
        let _ = io::stdout().flush();

        Ok(true)
    }

    /// Reads one entry, following a block header until its blank line.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let read = if first_line {
                self.editor.read_line(&self.prompt)?
            } else {
                self.editor.read_continuation(&self.continuation_prompt)?
            };

            match read {
                ReadResult::Line(line) => {
                    if first_line {
                        input = line;
                    } else {
                        input.push('\n');
                        input.push_str(&line);
                    }

                    if is_complete(&input) {
                        return Ok(Some(input));
                    }

                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    // End of input closes an open block.
                    return Ok(Some(input));
                }
            }
        }
    }

    /// Parses one entry and returns what the REPL would print.
    ///
    /// # Errors
    ///
    /// Returns the parse error of a line nothing matched, or an error for an
    /// unknown or malformed command.
    pub fn eval(&mut self, input: &str) -> Result<String> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            return self.command(command);
        }
        let first = input.lines().next().unwrap_or_default();
        if strip_comment(first).trim_end().ends_with(':') {
            self.eval_script(input)
        } else {
            self.eval_statement(strip_comment(trimmed).trim())
        }
    }

    fn eval_statement(&mut self, text: &str) -> Result<String> {
        let mut ctx = ParseContext::new(&self.registry).with_source(SOURCE);
        for name in &self.locals {
            ctx.declare(name);
        }

        let node = match parse_line(SyntaxCategory::Effect, text, &mut ctx) {
            Ok(node) => node,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => match parse_line(SyntaxCategory::Condition, text, &mut ctx) {
                Ok(node) => node,
                Err(other) if other.is_fatal() => return Err(other),
                Err(_) => return Err(err),
            },
        };

        let mut output = String::new();
        for diagnostic in ctx.diagnostics() {
            output.push_str(&self.renderer.diagnostic(SOURCE, text, diagnostic));
        }
        output.push_str(&self.describe(&node));
        debug!(candidates = ctx.candidates_tried(), "statement parsed");

        let declared: Vec<String> = ctx.declared().map(str::to_string).collect();
        self.locals.extend(declared);
        Ok(output)
    }

    fn eval_script(&self, input: &str) -> Result<String> {
        let ctx = ParseContext::new(&self.registry).with_source(SOURCE);
        let parse = parse_script_with(ctx, input)?;
        let mut output = String::new();
        for node in &parse.nodes {
            output.push_str(&self.describe(node));
        }
        output.push_str(&self.renderer.report(SOURCE, input, &parse));
        Ok(output)
    }

    fn describe(&self, node: &SyntaxNode) -> String {
        if self.show_tree {
            render_tree(node, &self.registry)
        } else {
            format!("{} '{}'\n", node.category, node.name)
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn command(&mut self, command: &str) -> Result<String> {
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, r)| (n, r.trim()));
        match name {
            "expr" | "e" => self.eval_expression(rest),
            "tree" => {
                self.show_tree = !self.show_tree;
                let state = if self.show_tree { "on" } else { "off" };
                Ok(format!("tree output {state}\n"))
            }
            "types" => Ok(self.list_types()),
            "syntax" => Ok(self.list_syntax()),
            "help" | "h" | "?" => Ok(HELP.to_string()),
            other => Err(Error::new(ErrorKind::Internal(format!(
                "unknown command ':{other}', try :help"
            )))),
        }
    }

    /// `:expr <types> <text>`, where `<types>` is a comma-separated list of
    /// singular or plural type names.
    fn eval_expression(&self, rest: &str) -> Result<String> {
        let Some((spec, text)) = rest.split_once(char::is_whitespace) else {
            return Err(Error::new(ErrorKind::Internal(
                "usage: :expr <types> <expression>".to_string(),
            )));
        };
        let types = self.resolve_types(spec)?;
        let mut ctx = ParseContext::new(&self.registry).with_source(SOURCE);
        let text = text.trim();
        let expr = parse_expression(text, &types, &mut ctx)?;

        let mut output = String::new();
        for diagnostic in ctx.diagnostics() {
            output.push_str(&self.renderer.diagnostic(SOURCE, text, diagnostic));
        }
        output.push_str(&render_expr(&expr, &self.registry));
        Ok(output)
    }

    fn resolve_types(&self, spec: &str) -> Result<Vec<PatternType>> {
        spec.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                self.registry
                    .types()
                    .resolve(name)
                    .ok_or_else(|| Error::unknown_type(name))
            })
            .collect()
    }

    fn list_types(&self) -> String {
        let types = self.registry.types();
        let mut out = String::new();
        for (id, descriptor) in types.types() {
            out.push_str(&format!("{} ({})", descriptor.name, descriptor.plural));
            if let Some(parent) = types.supertype(id) {
                out.push_str(&format!(" : {}", types.name(parent)));
            }
            out.push('\n');
        }
        out
    }

    fn list_syntax(&self) -> String {
        let mut out = String::new();
        for def in self.registry.definitions() {
            out.push_str(&format!("{} '{}' (priority {})\n", def.category, def.name, def.priority));
            for pattern in &def.patterns {
                out.push_str(&format!("    {}\n", pattern.source()));
            }
        }
        out
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    fn print_banner(&self) {
        println!("\x1b[1;36mSkript parser REPL v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
        println!(
            "{} syntax elements loaded. Type :help for commands, Ctrl+D to exit.\n",
            self.registry.definitions().len()
        );
        let _ = io::stdout().flush();
    }
}

const HELP: &str = "\
Lines are parsed as effects, then as conditions.
A line ending in ':' opens a block; finish it with a blank line.

:expr <types> <text>   Parse <text> as an expression of the given types
                       (comma-separated, plural names for lists)
:tree                  Toggle full tree output
:types                 List registered types
:syntax                List registered syntax and patterns
:help                  Show this help
:quit                  Exit
";

/// Words offered for completion: the literal words of every registered
/// pattern plus the REPL commands.
#[must_use]
pub fn keywords(registry: &Registry) -> Vec<String> {
    let mut words = BTreeSet::new();
    for def in registry.definitions() {
        for pattern in &def.patterns {
            collect_words(pattern.source(), &mut words);
        }
    }
    words.extend(COMMANDS.iter().map(ToString::to_string));
    words.into_iter().collect()
}

fn collect_words(source: &str, words: &mut BTreeSet<String>) {
    let mut word = String::new();
    let mut in_placeholder = false;
    for c in source.chars().chain(std::iter::once(' ')) {
        if c == '%' {
            in_placeholder = !in_placeholder;
        } else if !in_placeholder && c.is_alphabetic() {
            word.extend(c.to_lowercase());
            continue;
        }
        if word.chars().count() > 1 {
            words.insert(std::mem::take(&mut word));
        }
        word.clear();
    }
}
