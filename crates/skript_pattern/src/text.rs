//! Low-level text helpers shared by the compiler and the matcher.

/// Returns true for characters that make up words.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skips whitespace starting at byte offset `pos`.
#[must_use]
pub fn skip_whitespace(input: &str, pos: usize) -> usize {
    input[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(input.len(), |(i, _)| pos + i)
}

/// Returns true if `pos` does not split a word in two.
#[must_use]
pub fn is_boundary(input: &str, pos: usize) -> bool {
    let before = input[..pos].chars().next_back();
    let after = input[pos..].chars().next();
    !matches!((before, after), (Some(b), Some(a)) if is_word_char(b) && is_word_char(a))
}

/// Matches a lowercase, single-spaced literal at `pos`, ignoring leading
/// whitespace and case. A space in the literal matches one or more
/// whitespace characters.
///
/// Returns the byte offset right after the match.
#[must_use]
pub fn match_literal(input: &str, pos: usize, literal: &str) -> Option<usize> {
    let start = skip_whitespace(input, pos);
    let mut chars = input[start..].char_indices().peekable();
    let mut end = start;

    for expected in literal.chars() {
        if expected == ' ' {
            let mut any = false;
            while let Some(&(i, c)) = chars.peek() {
                if !c.is_whitespace() {
                    break;
                }
                any = true;
                end = start + i + c.len_utf8();
                chars.next();
            }
            if !any {
                return None;
            }
            continue;
        }
        let (i, c) = chars.next()?;
        if !eq_ignore_case(c, expected) {
            return None;
        }
        end = start + i + c.len_utf8();
    }
    Some(end)
}

fn eq_ignore_case(input: char, expected: char) -> bool {
    input == expected || input.to_lowercase().eq(expected.to_lowercase())
}

/// Lowercases and collapses whitespace, the form used to compare pattern
/// sources.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
