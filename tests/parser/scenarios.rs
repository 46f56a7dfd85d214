//! End-to-end scenarios for single lines and small scripts

use skript_foundation::{DiagnosticCode, ErrorKind, ObjectValue, PatternType, Value};
use skript_parser::{
    ParseContext, RegistryBuilder, SyntaxCategory, parse_expression, parse_line, parse_script,
};
use skript_types::TypeDescriptor;

use crate::{defaults, give_registry};

// =============================================================================
// give [the] %item% to %player%
// =============================================================================

#[test]
fn give_the_sword_to_alice() {
    let reg = give_registry();
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, "give the sword to Alice", &mut ctx).unwrap();

    assert_eq!(node.category, SyntaxCategory::Effect);
    assert_eq!(node.arguments.len(), 2);

    let item = node.argument(0).unwrap();
    let player = node.argument(1).unwrap();
    assert_eq!(reg.types().name(item.ty.ty), "item");
    assert_eq!(reg.types().name(player.ty.ty), "player");
    assert_eq!(
        item.as_literal(),
        Some(&Value::Object(ObjectValue::new("item", "sword")))
    );
    assert_eq!(
        player.as_literal(),
        Some(&Value::Object(ObjectValue::new("player", "Alice")))
    );
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn give_without_article_and_in_other_case() {
    let reg = give_registry();
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, "GIVE Sword  TO   Bob", &mut ctx).unwrap();
    assert_eq!(
        node.argument(1).and_then(|a| a.as_literal()),
        Some(&Value::Object(ObjectValue::new("player", "Bob")))
    );
}

#[test]
fn placeholder_spans_several_words() {
    let reg = give_registry();
    let mut ctx = ParseContext::new(&reg);
    let line = "give the diamond sword to Alice";
    let node = parse_line(SyntaxCategory::Effect, line, &mut ctx).unwrap();
    let item = node.argument(0).unwrap();
    assert_eq!(item.span.text(line), "diamond sword");
}

#[test]
fn give_sword_reports_the_missing_placeholder() {
    let reg = give_registry();
    let mut ctx = ParseContext::new(&reg);
    let err = parse_line(SyntaxCategory::Effect, "give sword", &mut ctx).unwrap_err();
    match err.kind {
        ErrorKind::NoMatch {
            ref category,
            ref input,
            ref near_miss,
        } => {
            assert_eq!(category, "effect");
            assert_eq!(input, "give sword");
            let near = near_miss.as_deref().unwrap();
            assert!(near.contains("give [the] %item% to %player%"), "{near}");
            assert!(near.contains("expected 'to %player%'"), "{near}");
        }
        other => panic!("unexpected {other:?}"),
    }
    let best = skript_parser::NearMiss::best(ctx.near_misses()).unwrap();
    assert_eq!(best.progress, "give sword".len());
}

#[test]
fn wrong_argument_types_do_not_match() {
    let reg = give_registry();
    let mut ctx = ParseContext::new(&reg);
    // "alice" is not capitalised, so it is not a player.
    assert!(parse_line(SyntaxCategory::Effect, "give sword to alice", &mut ctx).is_err());
    assert!(parse_line(SyntaxCategory::Effect, "give shovel to Alice", &mut ctx).is_err());
}

// =============================================================================
// wait / wait %duration%
// =============================================================================

fn wait_registry(placeholder_first: bool) -> skript_parser::Registry {
    let mut b = RegistryBuilder::new();
    b.register_type(
        TypeDescriptor::new("duration", "durations")
            .with_literal_parser(|s| skript_stdlib::parse_duration(s).map(Value::Duration)),
    )
    .unwrap();
    let mut patterns = ["wait", "wait %duration%"];
    if placeholder_first {
        patterns.reverse();
    }
    for pattern in patterns {
        b.register_syntax(SyntaxCategory::Effect, pattern, 1, |node, _| Ok(node))
            .unwrap();
    }
    b.build()
}

#[test]
fn bare_wait_never_tries_the_placeholder_pattern() {
    let reg = wait_registry(false);
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, "wait", &mut ctx).unwrap();
    assert_eq!(&*node.name, "wait");
    assert!(node.arguments.is_empty());
    assert_eq!(ctx.candidates_tried(), 1);
}

#[test]
fn wait_with_duration_falls_through() {
    let reg = wait_registry(false);
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, "wait 5 seconds", &mut ctx).unwrap();
    assert_eq!(&*node.name, "wait %duration%");
    assert_eq!(
        node.argument(0).and_then(|a| a.as_literal()),
        Some(&Value::Duration(std::time::Duration::from_secs(5)))
    );
    assert_eq!(ctx.candidates_tried(), 2);
}

#[test]
fn bare_wait_matches_whatever_the_order() {
    let reg = wait_registry(true);
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, "wait", &mut ctx).unwrap();
    assert_eq!(&*node.name, "wait");
}

// =============================================================================
// Scripts with a malformed line
// =============================================================================

#[test]
fn one_malformed_line_of_two() {
    let reg = defaults();
    let parsed = parse_script(&reg, "print \"hello\"\nfrobnicate the widget\n").unwrap();

    assert_eq!(parsed.diagnostics.len(), 1);
    let d = &parsed.diagnostics[0];
    assert_eq!((d.line, d.column), (2, 1));
    assert_eq!(d.code, DiagnosticCode::NoMatch);
    assert!(d.message.contains("frobnicate the widget"), "{}", d.message);

    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(&*parsed.nodes[0].name, "print");
}

#[test]
fn malformed_line_inside_a_trigger() {
    let reg = defaults();
    let src = "on script load:\n    frobnicate\n    print 1\n";
    let parsed = parse_script(&reg, src).unwrap();
    assert_eq!(parsed.errors().count(), 1);
    assert_eq!(parsed.diagnostics[0].line, 2);
    assert_eq!(parsed.diagnostics[0].column, 5);
    assert_eq!(parsed.nodes[0].children.len(), 1);
}

#[test]
fn every_failing_line_is_reported() {
    let reg = defaults();
    let src = "on script load:\n    one\n    print 1\n    two\nthree\n";
    let parsed = parse_script(&reg, src).unwrap();
    let lines: Vec<u32> = parsed.errors().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 4, 5]);
}

// =============================================================================
// Word boundaries
// =============================================================================

#[test]
fn separated_words_cannot_be_glued() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    for line in ["7 isprime", "7 isnotprime", "7 is notprime", "4 isdivisible by 2"] {
        assert!(
            parse_line(SyntaxCategory::Condition, line, &mut ctx).is_err(),
            "{line} should not parse"
        );
    }
    for (line, mark) in [("7 is prime", 0), ("7 isn't prime", 1), ("4 is not divisible by 2", 1)] {
        let node = parse_line(SyntaxCategory::Condition, line, &mut ctx).unwrap();
        assert_eq!(node.parse_mark, mark, "{line}");
    }
}

#[test]
fn glued_pattern_text_still_matches() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    assert!(parse_line(SyntaxCategory::Event, "script loading", &mut ctx).is_ok());
    let time = PatternType::single(reg.types().type_id("time").unwrap());
    for text in ["6 o'clock", "6 o' clock"] {
        assert!(parse_expression(text, &[time], &mut ctx).is_ok(), "{text}");
    }
}

#[test]
fn continuing_a_word_is_unexpected() {
    let reg = defaults();
    for (line, rest) in [("printx 1", "x 1"), ("printİ 1", "İ 1")] {
        let mut ctx = ParseContext::new(&reg);
        assert!(parse_line(SyntaxCategory::Effect, line, &mut ctx).is_err());
        let best = skript_parser::NearMiss::best(ctx.near_misses()).unwrap();
        assert_eq!(best.pattern, "print %objects%");
        assert_eq!(best.progress, "print".len());
        assert_eq!(best.reason, format!("unexpected '{rest}'"));
    }
}
