//! Structural matching of one pattern against a region of a line.
//!
//! The match program is run with an explicit stack of backtrack frames.
//! Placeholder and regex extents are found by enumerating candidate split
//! points (shortest first). Placeholder spans are parsed lazily through the
//! caller-supplied resolver; regex spans are tested in place.

use std::collections::HashMap;

use skript_foundation::Result;
use skript_pattern::text::{is_boundary, match_literal, skip_whitespace};
use skript_pattern::{FollowSet, Instr, Pattern, Placeholder};

use crate::node::Expr;

/// Result of resolving one placeholder span or matching one pattern.
#[derive(Clone, Debug)]
pub(crate) enum Outcome<T> {
    /// Success.
    Matched(T),
    /// Not a hard error: the caller tries something else.
    Rejected(String),
}

/// A successful structural match.
#[derive(Debug)]
pub(crate) struct Match {
    pub arguments: Vec<Option<Expr>>,
    pub mark: i64,
    pub matches: Vec<String>,
    pub tags: Vec<String>,
}

/// A failed structural match with the furthest point reached.
#[derive(Debug)]
pub(crate) struct Failure {
    pub progress: usize,
    pub reason: String,
    /// The pattern matched and the producer turned the node down.
    pub produced: bool,
}

/// Something a thread picked up on its way, undone on backtracking.
enum Capture {
    Argument(usize, Option<Expr>),
    Regex(String),
    Tag(String),
}

#[derive(Copy, Clone, Debug)]
struct Thread {
    pc: usize,
    pos: usize,
    trail: usize,
    mark: i64,
}

#[derive(Copy, Clone, Debug)]
enum End {
    At(usize),
    Absent,
}

#[derive(Copy, Clone, Debug)]
enum Slot {
    Placeholder(usize),
    Regex(usize),
}

enum Frame {
    Resume(Thread),
    Slot {
        thread: Thread,
        slot: Slot,
        start: usize,
        ends: Vec<End>,
        next: usize,
    },
}

/// Tracks the furthest failure.
struct Progress {
    pos: usize,
    reason: Option<String>,
}

impl Progress {
    fn record(&mut self, pos: usize, reason: impl FnOnce() -> String) {
        if self.reason.is_none() || pos > self.pos {
            self.pos = pos;
            self.reason = Some(reason());
        }
    }
}

fn unexpected(line: &str, at: usize, to: usize) -> String {
    format!("unexpected '{}'", line[at..to].trim())
}

/// Matches `pattern` against `line[from..to]`, which must be consumed
/// entirely (surrounding whitespace aside).
///
/// `resolve(placeholder, start, end)` parses a placeholder span; a
/// [`Outcome::Rejected`] makes the matcher try the next split point, an
/// `Err` aborts the whole match.
pub(crate) fn run<F>(
    pattern: &Pattern,
    line: &str,
    from: usize,
    to: usize,
    mut resolve: F,
) -> Result<std::result::Result<Match, Failure>>
where
    F: FnMut(&Placeholder, usize, usize) -> Result<Outcome<Expr>>,
{
    let program = pattern.program();
    let placeholders = pattern.placeholders();
    let regexes = pattern.regexes();
    let region = &line[..to];

    let mut stack: Vec<Frame> = Vec::new();
    let mut trail: Vec<Capture> = Vec::new();
    let mut memo: HashMap<(usize, usize, usize), Outcome<Expr>> = HashMap::new();
    let mut progress = Progress { pos: from, reason: None };
    let mut current = Some(Thread {
        pc: 0,
        pos: from,
        trail: 0,
        mark: 0,
    });

    loop {
        // Run the current thread until it ends or fails.
        while let Some(mut t) = current.take() {
            let Some(instr) = program.get(t.pc) else {
                break;
            };
            match instr {
                Instr::Lit(text) => match match_literal(region, t.pos, text) {
                    Some(end) => {
                        t.pos = end;
                        t.pc += 1;
                        current = Some(t);
                    }
                    None => {
                        let at = skip_whitespace(region, t.pos);
                        progress.record(at, || {
                            format!("expected '{}'", pattern.remainder_from(t.pc))
                        });
                    }
                },
                Instr::Boundary => {
                    let at = skip_whitespace(region, t.pos);
                    if is_boundary(region, at) {
                        t.pc += 1;
                        current = Some(t);
                    } else {
                        progress.record(at, || unexpected(line, at, to));
                    }
                }
                Instr::Split { prefer, alt } => {
                    stack.push(Frame::Resume(Thread { pc: *alt, ..t }));
                    t.pc = *prefer;
                    current = Some(t);
                }
                Instr::Jump(target) => {
                    t.pc = *target;
                    current = Some(t);
                }
                Instr::Mark(mark) => {
                    t.mark ^= mark;
                    t.pc += 1;
                    current = Some(t);
                }
                Instr::Tag(tag) => {
                    trail.truncate(t.trail);
                    trail.push(Capture::Tag(tag.clone()));
                    t.trail = trail.len();
                    t.pc += 1;
                    current = Some(t);
                }
                Instr::End => {
                    let rest = skip_whitespace(region, t.pos);
                    if rest >= to {
                        trail.truncate(t.trail);
                        return Ok(Ok(finish(trail, placeholders.len(), t.mark)));
                    }
                    progress.record(rest, || unexpected(line, rest, to));
                }
                Instr::Slot { index, follow } | Instr::Regex { index, follow } => {
                    let (slot, nullable) = match instr {
                        Instr::Slot { .. } => {
                            let Some(placeholder) = placeholders.get(*index) else {
                                continue;
                            };
                            (Slot::Placeholder(*index), placeholder.nullable)
                        }
                        _ => (Slot::Regex(*index), false),
                    };
                    let start = skip_whitespace(region, t.pos);
                    let mut ends = split_points(region, start, to, follow);
                    if nullable {
                        ends.push(End::Absent);
                    }
                    if ends.is_empty() {
                        if start >= to {
                            progress.record(start, || {
                                format!("expected '{}'", pattern.remainder_from(t.pc))
                            });
                        } else if !is_boundary(region, start) {
                            progress.record(start, || unexpected(line, start, to));
                        } else {
                            // Nothing that may follow the capture occurs;
                            // report what is missing after it.
                            progress.record(to, || {
                                let missing = pattern.remainder_from(t.pc + 1);
                                if missing.is_empty() {
                                    unexpected(line, start, to)
                                } else {
                                    format!("expected '{missing}'")
                                }
                            });
                        }
                        continue;
                    }
                    stack.push(Frame::Slot {
                        thread: t,
                        slot,
                        start,
                        ends,
                        next: 0,
                    });
                }
            }
        }

        // Backtrack.
        let Some(frame) = stack.pop() else {
            return Ok(Err(Failure {
                progress: progress.pos,
                reason: progress
                    .reason
                    .unwrap_or_else(|| "no match".to_string()),
                produced: false,
            }));
        };
        match frame {
            Frame::Resume(t) => {
                trail.truncate(t.trail);
                current = Some(t);
            }
            Frame::Slot {
                thread,
                slot,
                start,
                ends,
                next,
            } => {
                let Some(&end) = ends.get(next) else {
                    continue;
                };
                trail.truncate(thread.trail);
                stack.push(Frame::Slot {
                    thread,
                    slot,
                    start,
                    ends,
                    next: next + 1,
                });

                let (capture, resume_at) = match (slot, end) {
                    (Slot::Placeholder(index), End::Absent) => {
                        (Capture::Argument(index, None), thread.pos)
                    }
                    (Slot::Regex(_), End::Absent) => continue,
                    (Slot::Placeholder(index), End::At(end)) => {
                        let key = (index, start, end);
                        let outcome = match memo.get(&key) {
                            Some(o) => o.clone(),
                            None => {
                                let o = resolve(&placeholders[index], start, end)?;
                                memo.insert(key, o.clone());
                                o
                            }
                        };
                        match outcome {
                            Outcome::Matched(expr) => (Capture::Argument(index, Some(expr)), end),
                            Outcome::Rejected(reason) => {
                                progress.record(start, || reason);
                                continue;
                            }
                        }
                    }
                    (Slot::Regex(index), End::At(end)) => {
                        let text = &line[start..end];
                        match regexes.get(index) {
                            Some(regex) if regex.is_match(text) => {
                                (Capture::Regex(text.to_string()), end)
                            }
                            Some(regex) => {
                                progress.record(start, || {
                                    format!("'{text}' does not match <{}>", regex.source())
                                });
                                continue;
                            }
                            None => continue,
                        }
                    }
                };
                trail.push(capture);
                current = Some(Thread {
                    pc: thread.pc + 1,
                    pos: resume_at,
                    trail: trail.len(),
                    mark: thread.mark,
                });
            }
        }
    }
}

fn finish(trail: Vec<Capture>, placeholders: usize, mark: i64) -> Match {
    let mut found = Match {
        arguments: vec![None; placeholders],
        mark,
        matches: Vec::new(),
        tags: Vec::new(),
    };
    for capture in trail {
        match capture {
            Capture::Argument(index, expr) => {
                if let Some(slot) = found.arguments.get_mut(index) {
                    *slot = expr;
                }
            }
            Capture::Regex(text) => found.matches.push(text),
            Capture::Tag(tag) => found.tags.push(tag),
        }
    }
    found
}

/// Candidate end offsets for a placeholder starting at `start`, shortest
/// first. Positions inside quotes, parentheses or variable braces are
/// skipped, and a span never starts or ends inside a word.
fn split_points(line: &str, start: usize, to: usize, follow: &FollowSet) -> Vec<End> {
    let mut ends = Vec::new();
    if start >= to || !is_boundary(line, start) {
        return ends;
    }
    let mut push = |end: usize| {
        let trimmed = start + line[start..end].trim_end().len();
        if trimmed > start && is_boundary(line, trimmed) {
            if !ends.iter().any(|e| matches!(e, End::At(x) if *x == trimmed)) {
                ends.push(End::At(trimmed));
            }
        }
    };

    let mut quoted = false;
    let mut parens = 0usize;
    let mut braces = 0usize;
    for (offset, c) in line[start..to].char_indices() {
        let pos = start + offset;
        let nested = quoted || parens > 0 || braces > 0;
        if !nested && pos > start {
            if follow.open && is_boundary(line, pos) {
                push(pos);
            }
            for literal in &follow.literals {
                let first_is_word = literal
                    .chars()
                    .next()
                    .is_some_and(skript_pattern::text::is_word_char);
                if (!first_is_word || is_boundary(line, pos))
                    && match_literal(line, pos, literal).is_some()
                    && skip_whitespace(line, pos) == pos
                {
                    push(pos);
                }
            }
        }
        match c {
            '"' => quoted = !quoted,
            '(' if !quoted => parens += 1,
            ')' if !quoted => parens = parens.saturating_sub(1),
            '{' if !quoted => braces += 1,
            '}' if !quoted => braces = braces.saturating_sub(1),
            _ => {}
        }
    }
    if follow.end || follow.open {
        push(to);
    }
    ends
}
