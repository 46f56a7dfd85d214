//! Tests for recursion limits, cancellation and sharing one registry
//! between threads

use skript_foundation::{DiagnosticCode, ErrorKind};
use skript_parser::{
    CancellationToken, DEFAULT_MAX_DEPTH, ParseContext, Registry, SyntaxCategory, parse_line,
    parse_script, parse_script_with,
};

use crate::{defaults, game_builder};

fn sum_of(terms: usize) -> String {
    let terms: Vec<String> = (1..=terms).map(|n| n.to_string()).collect();
    format!("print {}", terms.join(" + "))
}

// =============================================================================
// Recursion limit
// =============================================================================

#[test]
fn shallow_limit_stops_nested_expressions() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg).with_max_depth(1);
    let err = parse_line(SyntaxCategory::Effect, "print 1 + 2", &mut ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RecursionLimit { limit: 1 }));
    assert!(parse_line(SyntaxCategory::Effect, "print 3", &mut ctx).is_ok());
}

#[test]
fn depth_is_restored_after_each_line() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    parse_line(SyntaxCategory::Effect, &sum_of(10), &mut ctx).unwrap();
    assert_eq!(ctx.depth(), 0);
    let _ = parse_line(SyntaxCategory::Effect, "print (1 +", &mut ctx);
    assert_eq!(ctx.depth(), 0);
}

#[test]
fn long_sums_fit_the_default_limit() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    let node = parse_line(SyntaxCategory::Effect, &sum_of(10), &mut ctx).unwrap();
    assert!(node.size() >= 19);
}

#[test]
fn very_long_sums_hit_the_default_limit() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    let err = parse_line(SyntaxCategory::Effect, &sum_of(DEFAULT_MAX_DEPTH + 10), &mut ctx)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::RecursionLimit { limit } if limit == DEFAULT_MAX_DEPTH
    ));
}

#[test]
fn script_reports_the_limit_per_line() {
    let reg = defaults();
    let ctx = ParseContext::new(&reg).with_max_depth(1);
    let parsed = parse_script_with(ctx, "print 1 + 2\nprint 3\n").unwrap();
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].code, DiagnosticCode::RecursionLimit);
    assert_eq!(parsed.diagnostics[0].line, 1);
    assert_eq!(parsed.nodes.len(), 1);
}

// =============================================================================
// Failing parses
// =============================================================================

fn failing_sum(terms: usize) -> String {
    format!("{} + banana", sum_of(terms))
}

fn candidates_for(line: &str) -> usize {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    let err = parse_line(SyntaxCategory::Effect, line, &mut ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoMatch { .. }), "{err}");
    ctx.candidates_tried()
}

#[test]
fn failing_sums_stay_polynomial() {
    let long = candidates_for(&failing_sum(30));
    assert!(long < 200_000, "tried {long} candidates");

    // Twice the terms costs at most a cubic factor.
    let short = candidates_for(&failing_sum(15));
    assert!(long < short * 16, "{short} candidates for 15 terms, {long} for 30");
}

#[test]
fn rejections_do_not_leak_into_the_next_line() {
    let reg = defaults();
    let mut ctx = ParseContext::new(&reg);
    // Same offsets, different text.
    assert!(parse_line(SyntaxCategory::Effect, "print 1 + abc", &mut ctx).is_err());
    let node = parse_line(SyntaxCategory::Effect, "print 1 + 234", &mut ctx).unwrap();
    assert!(node.argument(0).and_then(|a| a.as_syntax()).is_some());
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn cancelled_before_start() {
    let reg = defaults();
    let token = CancellationToken::new();
    token.cancel();
    let mut ctx = ParseContext::new(&reg).with_cancellation(token);
    let err = parse_line(SyntaxCategory::Effect, "print 1", &mut ctx).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Cancelled));
}

#[test]
fn cancelled_midway_returns_no_tree() {
    let mut b = game_builder();
    b.register_syntax(SyntaxCategory::Effect, "say %object%", 5, |node, _| Ok(node))
        .unwrap();
    b.register_syntax(SyntaxCategory::Effect, "stop", 5, |node, ctx| {
        ctx.cancellation().cancel();
        Ok(node)
    })
    .unwrap();
    let reg = b.build();

    let token = CancellationToken::new();
    let ctx = ParseContext::new(&reg).with_cancellation(token.clone());
    let err = parse_script_with(ctx, "say 1\nstop\nsay 2\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Cancelled));
    assert!(token.is_cancelled());

    let parsed = parse_script(&reg, "say 1\nsay 2\n").unwrap();
    assert_eq!(parsed.nodes.len(), 2);
}

// =============================================================================
// Sharing
// =============================================================================

const SCRIPT: &str = "\
on script load:
    set {_total} to 1 + 2 * 3
    loop 1, 2 and 3:
        print {_total}, \"x\" and 5 seconds
    wait a minute
at 6:30:
    print {_unset}
every 1 tick:
    frobnicate the widget
";

#[test]
fn registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<CancellationToken>();
}

#[test]
fn concurrent_parses_agree() {
    let reg = defaults();
    let serial = parse_script(&reg, SCRIPT).unwrap();
    assert_eq!(serial.errors().count(), 1);

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| parse_script(&reg, SCRIPT).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for parsed in results {
        assert_eq!(parsed, serial);
    }
}
