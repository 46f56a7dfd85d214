//! Linear match program lowered from the element tree.
//!
//! The matcher runs this program with an explicit backtracking stack, so
//! nested optionals and choices never cost native recursion.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::element::{PatternElement, Placeholder, RegexElement};

/// One instruction of a match program.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instr {
    /// Match literal text (lowercase, single-spaced).
    Lit(String),
    /// Require a word boundary before the next non-whitespace character.
    Boundary,
    /// Capture a placeholder.
    Slot {
        /// Placeholder index.
        index: usize,
        /// What may come right after the placeholder.
        follow: FollowSet,
    },
    /// Capture text matched by a regex element.
    Regex {
        /// Regex index.
        index: usize,
        /// What may come right after the captured text.
        follow: FollowSet,
    },
    /// Try `prefer` first, backtrack to `alt`.
    Split {
        /// Preferred continuation.
        prefer: usize,
        /// Fallback continuation.
        alt: usize,
    },
    /// Continue at the given instruction.
    Jump(usize),
    /// XOR a parse mark into the match state.
    Mark(i64),
    /// Record a parse tag.
    Tag(String),
    /// Successful end of the pattern.
    End,
}

/// The things that can directly follow a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FollowSet {
    /// Literals that may start right after the placeholder.
    pub literals: Vec<String>,
    /// Whether the pattern may end right after the placeholder.
    pub end: bool,
    /// Whether another placeholder or regex may follow directly, so any
    /// word boundary is a candidate split point.
    pub open: bool,
}

/// Lowers an element tree into a program ending in [`Instr::End`].
pub(crate) fn lower(root: &PatternElement) -> Vec<Instr> {
    let mut program = Vec::new();
    emit(root, &mut program);
    program.push(Instr::End);

    for pc in 0..program.len() {
        if matches!(program[pc], Instr::Slot { .. } | Instr::Regex { .. }) {
            let follow = follow_set(&program, pc + 1);
            if let Instr::Slot { follow: f, .. } | Instr::Regex { follow: f, .. } =
                &mut program[pc]
            {
                *f = follow;
            }
        }
    }
    program
}

fn emit(element: &PatternElement, program: &mut Vec<Instr>) {
    match element {
        PatternElement::Literal(text) => program.push(Instr::Lit(text.clone())),
        PatternElement::Space => program.push(Instr::Boundary),
        PatternElement::Placeholder(index) => program.push(Instr::Slot {
            index: *index,
            follow: FollowSet::default(),
        }),
        PatternElement::Regex(index) => program.push(Instr::Regex {
            index: *index,
            follow: FollowSet::default(),
        }),
        PatternElement::Sequence(items) => {
            for item in items {
                emit(item, program);
            }
        }
        PatternElement::Optional(inner) => {
            let split = program.len();
            program.push(Instr::Split { prefer: split + 1, alt: 0 });
            emit(inner, program);
            let after = program.len();
            program[split] = Instr::Split {
                prefer: split + 1,
                alt: after,
            };
        }
        PatternElement::Choice(branches) => {
            let mut jumps = Vec::new();
            for (i, branch) in branches.iter().enumerate() {
                let last = i + 1 == branches.len();
                let split = program.len();
                if !last {
                    program.push(Instr::Split { prefer: split + 1, alt: 0 });
                }
                if let Some(mark) = branch.mark {
                    program.push(Instr::Mark(mark));
                }
                if let Some(tag) = &branch.tag {
                    program.push(Instr::Tag(tag.clone()));
                }
                emit(&branch.element, program);
                if !last {
                    jumps.push(program.len());
                    program.push(Instr::Jump(0));
                    let next = program.len();
                    program[split] = Instr::Split {
                        prefer: split + 1,
                        alt: next,
                    };
                }
            }
            let end = program.len();
            for j in jumps {
                program[j] = Instr::Jump(end);
            }
        }
    }
}

/// Collects the first literals, placeholders and ends reachable from `start`
/// without consuming input.
fn follow_set(program: &[Instr], start: usize) -> FollowSet {
    let mut set = FollowSet::default();
    let mut seen = vec![false; program.len()];
    let mut work = vec![start];

    while let Some(pc) = work.pop() {
        if pc >= program.len() || seen[pc] {
            continue;
        }
        seen[pc] = true;
        match &program[pc] {
            Instr::Lit(text) => {
                if !set.literals.contains(text) {
                    set.literals.push(text.clone());
                }
            }
            Instr::Slot { .. } | Instr::Regex { .. } => set.open = true,
            Instr::End => set.end = true,
            Instr::Boundary | Instr::Mark(_) | Instr::Tag(_) => work.push(pc + 1),
            Instr::Jump(target) => work.push(*target),
            Instr::Split { prefer, alt } => {
                work.push(*alt);
                work.push(*prefer);
            }
        }
    }
    set
}

/// Renders what the program still expects from `pc`, following preferred
/// branches: `"to %player%"`. Literals written without whitespace between
/// them stay glued: `load[ing]` renders as `"loading"`.
pub(crate) fn render_from(
    program: &[Instr],
    placeholders: &[Placeholder],
    regexes: &[RegexElement],
    pc: usize,
) -> String {
    let mut out = String::new();
    let mut space = false;
    let mut after_capture = false;
    let mut pc = pc;
    // Jumps only go forward, so this terminates.
    while let Some(instr) = program.get(pc) {
        let (part, capture) = match instr {
            Instr::Lit(text) => (Some(text.clone()), false),
            Instr::Slot { index, .. } => (placeholders.get(*index).map(|p| p.text.clone()), true),
            Instr::Regex { index, .. } => {
                (regexes.get(*index).map(|r| format!("<{}>", r.source())), true)
            }
            Instr::Boundary => {
                space = true;
                (None, false)
            }
            Instr::Split { prefer, .. } => {
                pc = *prefer;
                continue;
            }
            Instr::Jump(target) => {
                pc = *target;
                continue;
            }
            Instr::Mark(_) | Instr::Tag(_) => (None, false),
            Instr::End => break,
        };
        pc += 1;
        let Some(part) = part else {
            continue;
        };
        if !out.is_empty() && (space || capture || after_capture) {
            out.push(' ');
        }
        out.push_str(&part);
        space = false;
        after_capture = capture;
    }
    out
}
