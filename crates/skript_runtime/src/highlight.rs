//! Syntax highlighting for the REPL.

use std::borrow::Cow;

const RESET: &str = "\x1b[0m";
const COMMENT: &str = "\x1b[2;3m";
const STRING: &str = "\x1b[33m";
const NUMBER: &str = "\x1b[35m";
const VARIABLE: &str = "\x1b[34m";
const KEYWORD: &str = "\x1b[32m";
const COMMAND: &str = "\x1b[1;36m";

/// Highlighter for Skript lines.
pub struct SkriptHighlighter {
    keywords: Vec<String>,
}

impl SkriptHighlighter {
    /// Creates a highlighter with no keywords.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keywords: Vec::new(),
        }
    }

    /// Sets the words colored as keywords, typically the first words of
    /// registered patterns.
    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.keywords = keywords;
    }

    fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(word))
    }

    /// Highlights a line of input.
    #[must_use]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }
        if line.trim_start().starts_with(':') {
            return Cow::Owned(format!("{COMMAND}{line}{RESET}"));
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '#' if chars.peek() == Some(&'#') => {
                    result.push(c);
                    if let Some(next) = chars.next() {
                        result.push(next);
                    }
                }
                '#' => {
                    result.push_str(COMMENT);
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str(RESET);
                }
                '"' => {
                    result.push_str(STRING);
                    result.push(c);
                    while let Some(next) = chars.next() {
                        result.push(next);
                        if next == '"' {
                            if chars.peek() == Some(&'"') {
                                result.push('"');
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                    result.push_str(RESET);
                }
                '{' => {
                    result.push_str(VARIABLE);
                    result.push(c);
                    let mut depth = 1usize;
                    while let Some(next) = chars.next() {
                        result.push(next);
                        match next {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    result.push_str(RESET);
                }
                c if c.is_ascii_digit() => {
                    result.push_str(NUMBER);
                    result.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_digit() || next == '.' {
                            result.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    result.push_str(RESET);
                }
                c if c.is_alphabetic() => {
                    let mut word = String::new();
                    word.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_alphanumeric() || next == '_' || next == '\'' {
                            word.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if self.is_keyword(&word) {
                        result.push_str(KEYWORD);
                        result.push_str(&word);
                        result.push_str(RESET);
                    } else {
                        result.push_str(&word);
                    }
                }
                _ => result.push(c),
            }
        }

        Cow::Owned(result)
    }
}

impl Default for SkriptHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
