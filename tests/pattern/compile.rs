//! Pattern structure and match programs

use proptest::prelude::*;
use skript_pattern::{Acceptance, Instr, Pattern, PatternElement};
use skript_types::TypeLookup;

use crate::types;

fn slots(p: &Pattern) -> Vec<&skript_pattern::FollowSet> {
    p.program()
        .iter()
        .filter_map(|i| match i {
            Instr::Slot { follow, .. } => Some(follow),
            _ => None,
        })
        .collect()
}

#[test]
fn give_pattern() {
    let ts = types();
    let p = Pattern::compile("give [the] %item% to %player%", &ts).unwrap();
    assert_eq!(p.source(), "give [the] %item% to %player%");
    assert_eq!(p.to_string(), p.source());
    assert_eq!(p.specificity(), 2);

    let ph = p.placeholders();
    assert_eq!(ph.len(), 2);
    assert_eq!(ph[0].types, vec![ts.resolve("item").unwrap()]);
    assert_eq!(ph[1].types, vec![ts.resolve("player").unwrap()]);
    assert!(ph.iter().all(|p| p.is_single() && !p.nullable));
    assert_eq!(ph[1].offset, "give [the] %item% to ".len());

    let follow = slots(&p);
    assert!(follow[0].literals.iter().any(|l| l.trim() == "to"));
    assert!(!follow[0].end);
    assert!(follow[1].end);
    assert!(follow[1].literals.is_empty());
}

#[test]
fn optional_tail_makes_end_a_follow() {
    let ts = types();
    let p = Pattern::compile("wait %duration% [please]", &ts).unwrap();
    let follow = slots(&p);
    assert!(follow[0].end);
    assert!(follow[0].literals.iter().any(|l| l.trim() == "please"));
}

#[test]
fn several_types_and_plurals() {
    let ts = types();
    let p = Pattern::compile("drop %items/numbers% at %player%", &ts).unwrap();
    let ph = &p.placeholders()[0];
    assert_eq!(ph.types.len(), 2);
    assert!(!ph.is_single());
    assert_eq!(ph.acceptance, Acceptance::All);
}

#[test]
fn flags() {
    let ts = types();
    let p = Pattern::compile("if %=boolean% then %-*number% else %~objects%", &ts).unwrap();
    let ph = p.placeholders();
    assert!(ph[0].conditions);
    assert!(ph[1].nullable);
    assert_eq!(ph[1].acceptance, Acceptance::LiteralsOnly);
    assert_eq!(ph[2].acceptance, Acceptance::NonLiterals);
}

#[test]
fn choices_and_marks() {
    let ts = types();
    let p = Pattern::compile("1¦noon|2:midnight|dawn", &ts).unwrap();
    let PatternElement::Choice(branches) = p.root() else {
        panic!("expected a choice, got {:?}", p.root());
    };
    let marks: Vec<Option<i64>> = branches.iter().map(|b| b.mark).collect();
    assert_eq!(marks, vec![Some(1), Some(2), None]);
    assert!(p.program().contains(&Instr::Mark(2)));
    assert_eq!(p.specificity(), 0);
}

#[test]
fn case_and_whitespace_are_normalized() {
    let ts = types();
    let p = Pattern::compile("Give   THE %item%", &ts).unwrap();
    assert_eq!(p.normalized(), "give the %item%");
    assert!(p.program().iter().all(|i| match i {
        Instr::Lit(text) => text == &text.to_lowercase(),
        _ => true,
    }));
}

#[test]
fn remainder_names_what_is_missing() {
    let ts = types();
    let p = Pattern::compile("give %item% to %player%", &ts).unwrap();
    let slot = p
        .program()
        .iter()
        .position(|i| matches!(i, Instr::Slot { index: 0, .. }))
        .unwrap();
    assert_eq!(p.remainder_from(slot + 1), "to %player%");
}

#[test]
fn tags_and_regex_elements() {
    let ts = types();
    let p = Pattern::compile("[the] [ctx:(context|event)-]<[a-z]+>", &ts).unwrap();
    assert!(p.placeholders().is_empty());
    assert_eq!(p.regexes().len(), 1);
    assert_eq!(p.regexes()[0].source(), "[a-z]+");
    assert!(p.regexes()[0].is_match("interval"));
    assert!(!p.regexes()[0].is_match("interval 2"));
    assert!(p.program().contains(&Instr::Tag("ctx".to_string())));
    assert!(p.program().iter().any(|i| matches!(i, Instr::Regex { index: 0, .. })));
}

#[test]
fn separated_literals_require_a_word_boundary() {
    let ts = types();
    let boundaries = |src: &str| {
        let p = Pattern::compile(src, &ts).unwrap();
        p.program().iter().filter(|i| **i == Instr::Boundary).count()
    };
    assert_eq!(boundaries("give [the] %item% to %player%"), 4);
    assert_eq!(boundaries("script load[ing]"), 0);
    assert_eq!(boundaries("%item% o'[ ]clock"), 1);
}

proptest! {
    /// Equal text always compiles to an equal pattern.
    #[test]
    fn compilation_is_deterministic(
        words in prop::collection::vec("[a-z]{1,6}", 1..4),
        optional in any::<bool>(),
        plural in any::<bool>(),
    ) {
        let ts = types();
        let ty = if plural { "items" } else { "item" };
        let head = words.join(" ");
        let src = if optional {
            format!("{head} [the] %{ty}%")
        } else {
            format!("{head} %{ty}%")
        };
        let a = Pattern::compile(&src, &ts).unwrap();
        let b = Pattern::compile(&src, &ts).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.specificity(), words.len());
        prop_assert_eq!(a.placeholders()[0].is_single(), !plural);
    }
}
