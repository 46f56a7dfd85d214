//! Pattern text to element tree.

use regex::Regex;
use skript_foundation::{Error, Result};
use skript_types::TypeLookup;

use crate::element::{Acceptance, ChoiceBranch, PatternElement, Placeholder, RegexElement};

/// Output of the front half of compilation.
pub(crate) struct ParsedPattern {
    pub root: PatternElement,
    pub placeholders: Vec<Placeholder>,
    pub regexes: Vec<RegexElement>,
}

/// Recursive-descent reader over the pattern text.
struct Reader<'a> {
    src: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    depth: usize,
    types: &'a dyn TypeLookup,
    placeholders: Vec<Placeholder>,
    regexes: Vec<RegexElement>,
    last_capture_end: Option<usize>,
}

/// Label written before a branch: `N:` marks, `name:` tags.
#[derive(Default)]
struct Label {
    mark: Option<i64>,
    tag: Option<String>,
}

/// Collects the items of one sequence, turning whitespace into
/// [`PatternElement::Space`] where it separates two items.
struct SequenceBuilder {
    items: Vec<PatternElement>,
    literal: String,
    space: bool,
    nested: bool,
}

impl SequenceBuilder {
    fn new(nested: bool) -> Self {
        Self {
            items: Vec::new(),
            literal: String::new(),
            space: false,
            nested,
        }
    }

    fn whitespace(&mut self) {
        if self.literal.is_empty() {
            self.space = true;
        } else if !self.literal.ends_with(' ') {
            self.literal.push(' ');
        }
    }

    fn flush(&mut self) {
        let text = self.literal.trim_end();
        if text.is_empty() {
            self.literal.clear();
            return;
        }
        let trailing = text.len() < self.literal.len();
        let text = text.to_string();
        self.literal.clear();
        self.push(PatternElement::Literal(text));
        self.space = trailing;
    }

    fn push(&mut self, element: PatternElement) {
        // A group's leading space still separates it from what came before.
        if self.space && (self.nested || !self.items.is_empty()) {
            self.items.push(PatternElement::Space);
        }
        self.space = false;
        self.items.push(element);
    }

    fn finish(mut self) -> PatternElement {
        self.flush();
        if self.space && self.nested && !self.items.is_empty() {
            self.items.push(PatternElement::Space);
        }
        PatternElement::Sequence(self.items)
    }
}

pub(crate) fn parse(src: &str, types: &dyn TypeLookup) -> Result<ParsedPattern> {
    let mut reader = Reader {
        src,
        chars: src.char_indices().collect(),
        pos: 0,
        depth: 0,
        types,
        placeholders: Vec::new(),
        regexes: Vec::new(),
        last_capture_end: None,
    };
    let branches = reader.alternatives(None)?;
    let root = collapse(branches, PatternElement::Choice);
    if root == PatternElement::Sequence(Vec::new()) {
        return Err(Error::pattern_syntax(src, 0, "pattern is empty"));
    }
    Ok(ParsedPattern {
        root,
        placeholders: reader.placeholders,
        regexes: reader.regexes,
    })
}

/// A single unlabelled branch stands for itself.
fn collapse(
    mut branches: Vec<ChoiceBranch>,
    wrap: fn(Vec<ChoiceBranch>) -> PatternElement,
) -> PatternElement {
    if branches.len() == 1 && branches[0].mark.is_none() && branches[0].tag.is_none() {
        branches.remove(0).element
    } else {
        wrap(branches)
    }
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.src.len(), |&(o, _)| o)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::pattern_syntax(self.src, offset, message)
    }

    /// Reads `a | b | ...` up to `closer` (or end of text when `None`),
    /// consuming the closer.
    fn alternatives(&mut self, closer: Option<(char, usize)>) -> Result<Vec<ChoiceBranch>> {
        let mut branches = Vec::new();
        loop {
            let label = self.label();
            let element = self.sequence()?;
            branches.push(ChoiceBranch {
                mark: label.mark,
                tag: label.tag,
                element,
            });
            match (self.peek(), closer) {
                (Some('|'), _) => {
                    self.bump();
                }
                (Some(c), Some((expected, _))) if c == expected => {
                    self.bump();
                    return Ok(branches);
                }
                (None, None) => return Ok(branches),
                (None, Some((expected, open))) => {
                    let opener = if expected == ']' { '[' } else { '(' };
                    return Err(self.error(open, format!("unclosed '{opener}'")));
                }
                (Some(c), _) => return Err(self.error(self.offset(), format!("unbalanced '{c}'"))),
            }
        }
    }

    /// Reads an `N:`/`N¦` parse mark or a `name:`/`name¦` tag at the start
    /// of a branch.
    fn label(&mut self) -> Label {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            word.push(c);
            self.pos += 1;
        }
        if !word.is_empty() && matches!(self.peek(), Some(':' | '¦')) {
            if word.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(mark) = word.parse() {
                    self.pos += 1;
                    return Label {
                        mark: Some(mark),
                        tag: None,
                    };
                }
            } else if !word.starts_with(|c: char| c.is_ascii_digit()) {
                self.pos += 1;
                return Label {
                    mark: None,
                    tag: Some(word),
                };
            }
        }
        self.pos = start;
        Label::default()
    }

    fn sequence(&mut self) -> Result<PatternElement> {
        let mut seq = SequenceBuilder::new(self.depth > 0);

        while let Some(c) = self.peek() {
            match c {
                '|' | ']' | ')' => break,
                '\\' => {
                    let at = self.offset();
                    self.bump();
                    let escaped = self
                        .bump()
                        .ok_or_else(|| self.error(at, "dangling escape"))?;
                    seq.literal.extend(escaped.to_lowercase());
                }
                '[' | '(' => {
                    seq.flush();
                    if let Some(group) = self.group(c)? {
                        seq.push(group);
                    }
                }
                '%' => {
                    seq.flush();
                    let index = self.placeholder()?;
                    seq.push(PatternElement::Placeholder(index));
                }
                '<' => {
                    seq.flush();
                    let index = self.regex()?;
                    seq.push(PatternElement::Regex(index));
                }
                c if c.is_whitespace() => {
                    self.bump();
                    seq.whitespace();
                }
                c => {
                    self.bump();
                    seq.literal.extend(c.to_lowercase());
                }
            }
        }
        Ok(seq.finish())
    }

    /// Reads a `[...]` or `(...)` group. `[ ]` yields nothing.
    fn group(&mut self, opener: char) -> Result<Option<PatternElement>> {
        let open = self.offset();
        self.bump();
        let closer = if opener == '[' { ']' } else { ')' };
        self.depth += 1;
        let branches = self.alternatives(Some((closer, open)));
        self.depth -= 1;
        let branches = branches?;
        let close = self.chars[self.pos - 1].0;
        let raw = &self.src[open + 1..close];

        if raw.trim().is_empty() {
            if opener == '[' && !raw.is_empty() {
                return Ok(None);
            }
            return Err(self.error(open, "empty group"));
        }

        Ok(Some(if opener == '[' {
            PatternElement::Optional(Box::new(collapse(branches, PatternElement::Choice)))
        } else {
            PatternElement::Choice(branches)
        }))
    }

    fn check_adjacent(&self, open: usize) -> Result<()> {
        if self.last_capture_end == Some(open) {
            return Err(self.error(open, "adjacent placeholders cannot be told apart"));
        }
        Ok(())
    }

    /// Reads `<regex>`. Backslashes are kept for the regex engine, so `\>`
    /// does not close the element.
    fn regex(&mut self) -> Result<usize> {
        let open = self.offset();
        self.check_adjacent(open)?;
        self.bump();
        let mut body = String::new();
        loop {
            match self.bump() {
                Some('>') => break,
                Some('\\') => {
                    body.push('\\');
                    if let Some(c) = self.bump() {
                        body.push(c);
                    }
                }
                Some(c) => body.push(c),
                None => return Err(self.error(open, "unclosed '<'")),
            }
        }
        self.last_capture_end = Some(self.offset());
        if body.is_empty() {
            return Err(self.error(open, "empty regex"));
        }
        let regex = Regex::new(&format!("^(?:{body})$"))
            .map_err(|e| self.error(open, format!("invalid regex: {e}")))?;
        let index = self.regexes.len();
        self.regexes.push(RegexElement::new(body, regex));
        Ok(index)
    }

    /// Reads `%flags type/type%` and registers the placeholder.
    fn placeholder(&mut self) -> Result<usize> {
        let open = self.offset();
        self.check_adjacent(open)?;
        self.bump();
        let mut body = String::new();
        loop {
            match self.bump() {
                Some('%') => break,
                Some(c) => body.push(c),
                None => return Err(self.error(open, "unclosed '%'")),
            }
        }
        self.last_capture_end = Some(self.offset());

        let mut nullable = false;
        let mut acceptance = Acceptance::All;
        let mut conditions = false;
        let mut rest = body.trim_start();
        while let Some(flag) = rest.chars().next() {
            match flag {
                '-' => nullable = true,
                '=' => conditions = true,
                '*' | '~' => {
                    let wanted = if flag == '*' {
                        Acceptance::LiteralsOnly
                    } else {
                        Acceptance::NonLiterals
                    };
                    if acceptance != Acceptance::All && acceptance != wanted {
                        return Err(self.error(open, "conflicting '*' and '~' flags"));
                    }
                    acceptance = wanted;
                }
                _ => break,
            }
            rest = &rest[flag.len_utf8()..];
        }

        if rest.trim().is_empty() {
            return Err(self.error(open, "empty placeholder"));
        }
        let mut types = Vec::new();
        for name in rest.split('/') {
            let name = name.trim();
            if name.is_empty() {
                return Err(self.error(open, "empty type name in placeholder"));
            }
            let ty = self
                .types
                .resolve(name)
                .ok_or_else(|| self.error(open, format!("unknown type '{name}'")))?;
            types.push(ty);
        }

        let index = self.placeholders.len();
        self.placeholders.push(Placeholder {
            index,
            types,
            nullable,
            acceptance,
            conditions,
            offset: open,
            text: format!("%{body}%"),
        });
        Ok(index)
    }
}
