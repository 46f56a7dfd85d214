//! Tests for whole scripts: blocks, scopes, comments and indentation

use skript_foundation::{DiagnosticCode, Severity, Value};
use skript_parser::{ParserConfig, SyntaxCategory, parse_script};

use crate::defaults;

// =============================================================================
// Blocks
// =============================================================================

#[test]
fn nested_blocks() {
    let reg = defaults();
    let src = "\
on script load:
    set {_n} to 10
    if {_n} is divisible by 5:
        print \"five\"
        loop 1, 2 and 3:
            print {_n}
    wait 1 second
every 2 seconds:
    print \"tick\"
";
    let parsed = parse_script(&reg, src).unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.nodes.len(), 2);

    let load = &parsed.nodes[0];
    assert_eq!(&*load.name, "script load");
    let names: Vec<&str> = load.children.iter().map(|n| &*n.name).collect();
    assert_eq!(names, vec!["set", "if", "wait"]);

    let branch = &load.children[1];
    assert_eq!(branch.category, SyntaxCategory::Section);
    assert_eq!(branch.children.len(), 2);
    let repeat = &branch.children[1];
    assert_eq!(&*repeat.name, "loop");
    assert_eq!(repeat.children.len(), 1);

    assert_eq!(&*parsed.nodes[1].name, "periodical");
    assert_eq!(parsed.nodes[1].children.len(), 1);
}

#[test]
fn conditions_as_statements() {
    let reg = defaults();
    let parsed = parse_script(&reg, "on script load:\n    7 is prime\n").unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    assert_eq!(
        parsed.nodes[0].children[0].category,
        SyntaxCategory::Condition
    );
}

#[test]
fn top_level_section_header() {
    let reg = defaults();
    let parsed = parse_script(&reg, "if true:\n    print 1\n").unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.nodes[0].category, SyntaxCategory::Section);
}

#[test]
fn rejected_header_drops_its_block() {
    let reg = defaults();
    let src = "every 0 seconds:\n    print 1\nevery 1 second:\n    print 2\n";
    let parsed = parse_script(&reg, src).unwrap();
    let errors: Vec<_> = parsed.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert!(errors[0].message.contains("longer than zero"), "{}", errors[0].message);
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.nodes[0].children.len(), 1);
}

#[test]
fn empty_block_is_a_warning() {
    let reg = defaults();
    let parsed = parse_script(&reg, "on script load:\nevery 1 second:\n    print 1\n").unwrap();
    assert!(!parsed.has_errors());
    assert_eq!(parsed.diagnostics.len(), 1);
    let warning = &parsed.diagnostics[0];
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.code, DiagnosticCode::Structure);
    assert_eq!(warning.line, 1);
    assert!(warning.message.contains("script load"));
    assert_eq!(parsed.nodes.len(), 2);
}

// =============================================================================
// Local variable scopes
// =============================================================================

fn unset_lines(src: &str) -> Vec<u32> {
    let parsed = parse_script(&defaults(), src).unwrap();
    assert!(!parsed.has_errors(), "{:?}", parsed.diagnostics);
    parsed
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::UnsetVariable)
        .map(|d| d.line)
        .collect()
}

#[test]
fn unset_local_is_reported_where_it_is_read() {
    let parsed = parse_script(&defaults(), "on script load:\n    print {_missing}\n").unwrap();
    assert_eq!(parsed.diagnostics.len(), 1);
    let d = &parsed.diagnostics[0];
    assert_eq!(d.code, DiagnosticCode::UnsetVariable);
    assert_eq!(d.severity, Severity::Warning);
    assert_eq!((d.line, d.column), (2, 11));
}

#[test]
fn locals_do_not_leak_between_triggers() {
    let src = "\
on script load:
    set {_x} to 1
    print {_x}
every 1 second:
    print {_x}
";
    assert_eq!(unset_lines(src), vec![5]);
}

#[test]
fn locals_set_in_a_section_end_with_it() {
    let src = "\
on script load:
    if true:
        set {_y} to 1
        print {_y}
    print {_y}
";
    assert_eq!(unset_lines(src), vec![5]);
}

#[test]
fn outer_locals_are_visible_in_nested_blocks() {
    let src = "\
on script load:
    set {_a} and {_b} to 1
    while {_a} is prime:
        loop 1 or 2:
            print {_a} + {_b}
";
    assert!(unset_lines(src).is_empty());
}

#[test]
fn warnings_can_be_turned_off() {
    let mut config = ParserConfig::default();
    config.warn_unset_locals = false;
    let reg = skript_stdlib::default_registry_with(config).unwrap();
    let parsed = parse_script(&reg, "on script load:\n    print {_missing}\n").unwrap();
    assert!(parsed.diagnostics.is_empty());
}

// =============================================================================
// Comments, whitespace and indentation
// =============================================================================

#[test]
fn comments_blank_lines_and_tabs() {
    let reg = defaults();
    let src = "\
# a script
on script load: # header comment
\tprint \"a # not a comment\"
\t# indented comment

    print {score} # four spaces match one tab
";
    let parsed = parse_script(&reg, src).unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    let children = &parsed.nodes[0].children;
    assert_eq!(children.len(), 2);
    assert_eq!(
        children[0].argument(0).and_then(|a| a.as_literal()),
        Some(&Value::from("a # not a comment"))
    );
}

#[test]
fn windows_line_endings() {
    let reg = defaults();
    let parsed = parse_script(&reg, "on script load:\r\n    print 1\r\n").unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    assert_eq!(parsed.nodes[0].children.len(), 1);
}

#[test]
fn inconsistent_indentation() {
    let reg = defaults();
    let src = "\
on script load:
    print 1
      print 2
  print 3
print 4
";
    let parsed = parse_script(&reg, src).unwrap();
    let lines: Vec<u32> = parsed.errors().map(|d| d.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert!(parsed.errors().all(|d| d.code == DiagnosticCode::Structure));
    assert_eq!(parsed.nodes.len(), 2);
    assert_eq!(parsed.nodes[0].children.len(), 1);
}

#[test]
fn dedent_to_an_unknown_level() {
    let reg = defaults();
    let src = "\
on script load:
    if true:
        print 1
      print 2
";
    let parsed = parse_script(&reg, src).unwrap();
    let errors: Vec<_> = parsed.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 4);
    assert!(errors[0].message.contains("expected 8"), "{}", errors[0].message);
}

#[test]
fn indented_first_line() {
    let reg = defaults();
    let parsed = parse_script(&reg, "    print 1\n").unwrap();
    assert_eq!(parsed.errors().count(), 1);
    assert!(parsed.nodes.is_empty());
}

// =============================================================================
// Top-level statements
// =============================================================================

#[test]
fn top_level_statements_allowed_by_default() {
    let parsed = parse_script(&defaults(), "print 1\nprint 2\n").unwrap();
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.nodes.len(), 2);
}

#[test]
fn top_level_statements_forbidden() {
    let config = ParserConfig::default().with_top_level_statements(false);
    let reg = skript_stdlib::default_registry_with(config).unwrap();
    let src = "print 1\non script load:\n    print 2\nif true:\n    print 3\n";
    let parsed = parse_script(&reg, src).unwrap();
    let errors: Vec<(u32, DiagnosticCode)> = parsed.errors().map(|d| (d.line, d.code)).collect();
    assert_eq!(
        errors,
        vec![(1, DiagnosticCode::Structure), (4, DiagnosticCode::NoMatch)]
    );
    assert_eq!(parsed.nodes.len(), 1);
    assert_eq!(parsed.nodes[0].children.len(), 1);
}

// =============================================================================
// Context values
// =============================================================================

fn context_value_of(node: &skript_parser::SyntaxNode) -> &skript_parser::SyntaxNode {
    let value = node.argument(0).and_then(|a| a.as_syntax()).unwrap();
    assert_eq!(&*value.name, "context value");
    value
}

#[test]
fn context_values_of_the_enclosing_trigger() {
    let reg = defaults();
    let src = "\
every 5 seconds:
    print context-interval
    print the event-interval
    if true:
        print interval
at 6:30:
    print context-time
";
    let parsed = parse_script(&reg, src).unwrap();
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);

    let every = &parsed.nodes[0];
    let duration = reg.types().type_id("duration").unwrap();
    for print in [&every.children[0], &every.children[1], &every.children[2].children[0]] {
        let value = context_value_of(print);
        assert_eq!(value.matches, vec!["interval".to_string()]);
        assert_eq!(value.return_type.map(|t| t.ty), Some(duration));
    }
    assert!(context_value_of(&every.children[0]).has_tag("ctx"));
    assert!(!context_value_of(&every.children[2].children[0]).has_tag("ctx"));

    let time = reg.types().type_id("time").unwrap();
    let value = context_value_of(&parsed.nodes[1].children[0]);
    assert_eq!(value.return_type.map(|t| t.ty), Some(time));
}

#[test]
fn misused_context_values_are_reported() {
    let reg = defaults();
    let src = "\
every 5 seconds:
    print past interval
at 6:30:
    print time
on script load:
    print context-interval
";
    let parsed = parse_script(&reg, src).unwrap();
    let errors: Vec<_> = parsed.errors().collect();
    assert_eq!(errors.len(), 3, "{errors:?}");
    let expected = [
        (2, "time state of this context value (past) is incorrect"),
        (4, "'time' cannot be used alone"),
        (6, "no context value matching 'interval' was found"),
    ];
    for (error, (line, text)) in errors.iter().zip(expected) {
        assert_eq!(error.line, line);
        assert!(error.message.contains(text), "{}", error.message);
    }
}
