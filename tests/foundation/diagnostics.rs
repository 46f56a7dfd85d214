//! Integration tests for Diagnostic records

use skript_foundation::{Diagnostic, DiagnosticCode, Error, Severity, Span};

#[test]
fn diagnostic_from_error_takes_code_and_message() {
    let span = Span::new(0, 10, 2, 5);
    let diagnostic = Diagnostic::from_error(span, &Error::no_match("effect", "give sword", None));
    assert_eq!((diagnostic.line, diagnostic.column), (2, 5));
    assert_eq!(diagnostic.code, DiagnosticCode::NoMatch);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert!(diagnostic.is_error());
    assert!(diagnostic.message.contains("give sword"));
}

#[test]
fn coercion_errors_are_type_mismatches() {
    let d = Diagnostic::from_error(Span::at_start(), &Error::literal_parse("number", "x"));
    assert_eq!(d.code, DiagnosticCode::TypeMismatch);
    let d = Diagnostic::from_error(Span::at_start(), &Error::recursion_limit(3));
    assert_eq!(d.code, DiagnosticCode::RecursionLimit);
}

#[test]
fn diagnostic_display() {
    let d = Diagnostic::warning(
        Span::new(6, 10, 4, 7),
        DiagnosticCode::UnsetVariable,
        "{_x} is read before it is set",
    );
    assert!(!d.is_error());
    assert_eq!(
        d.to_string(),
        "4:7: warning [unset-variable]: {_x} is read before it is set"
    );
}

#[test]
fn severities_order_errors_first() {
    let mut all = vec![Severity::Info, Severity::Error, Severity::Warning];
    all.sort();
    assert_eq!(all, vec![Severity::Error, Severity::Warning, Severity::Info]);
}
