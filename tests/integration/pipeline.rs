//! Configuration file to registry to parsed script to rendered report

use std::fs;

use skript_foundation::DiagnosticCode;
use skript_parser::{AmbiguityPolicy, ParseContext, ParserConfig, parse_script, parse_script_with};
use skript_runtime::render::report_json;
use skript_runtime::{Renderer, load_config, parse_config, render_tree};
use skript_stdlib::default_registry_with;

const STRICT: &str = "\
# strict checking with a shallow limit
max depth: 2
ambiguity: deny
top level statements: false
";

const SCRIPT: &str = "\
print 1
on script load:
    print 1 + 2 * 3
    print 4
";

#[test]
fn strict_configuration_end_to_end() {
    let config = parse_config(STRICT, ParserConfig::default()).unwrap();
    assert_eq!(config.max_depth, 2);
    assert_eq!(config.ambiguity, AmbiguityPolicy::Deny);

    let registry = default_registry_with(config).unwrap();
    let parse = parse_script(&registry, SCRIPT).unwrap();
    let found: Vec<(u32, DiagnosticCode)> =
        parse.diagnostics.iter().map(|d| (d.line, d.code)).collect();
    assert_eq!(
        found,
        vec![(1, DiagnosticCode::Structure), (3, DiagnosticCode::RecursionLimit)]
    );
    assert_eq!(parse.nodes.len(), 1);
    assert_eq!(parse.nodes[0].children.len(), 1);

    let report = Renderer::new(false).report("test.sk", SCRIPT, &parse);
    assert!(
        report.contains("error[structure]: statements must be placed inside a trigger"),
        "{report}"
    );
    assert!(report.contains("  --> test.sk:1:1"), "{report}");
    assert!(report.contains("error[recursion-limit]"), "{report}");
    assert!(report.contains("  --> test.sk:3:5"), "{report}");
    assert!(report.ends_with("error: test.sk: 2 errors\n"), "{report}");
}

#[test]
fn default_configuration_accepts_the_same_script() {
    let registry = default_registry_with(ParserConfig::default()).unwrap();
    let parse = parse_script(&registry, SCRIPT).unwrap();
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
    assert_eq!(parse.nodes.len(), 2);
    assert_eq!(Renderer::new(false).report("test.sk", SCRIPT, &parse), "");
}

#[test]
fn configuration_file_on_disk() {
    let path = std::env::temp_dir().join(format!("skript-pipeline-{}.conf", std::process::id()));
    fs::write(&path, "list separators: , | and | und\nwarn unset locals: no\n").unwrap();
    let config = load_config(&path);
    fs::remove_file(&path).unwrap();
    let config = config.unwrap();

    let registry = default_registry_with(config).unwrap();
    let parse = parse_script(&registry, "on script load:\n    print 1 und {_x}\n").unwrap();
    assert!(parse.diagnostics.is_empty(), "{:?}", parse.diagnostics);
}

#[test]
fn json_report_carries_trees_on_request() {
    let registry = default_registry_with(ParserConfig::default()).unwrap();
    let source = "every 5 seconds:\n    print \"tick\"\n    frobnicate\n";
    let ctx = ParseContext::new(&registry).with_source("tick.sk");
    let parse = parse_script_with(ctx, source).unwrap();

    let plain = report_json("tick.sk", &parse, false).unwrap();
    assert!(plain.contains("\"file\": \"tick.sk\""), "{plain}");
    assert!(plain.contains("\"errors\": 1"), "{plain}");
    assert!(plain.contains("\"diagnostics\""), "{plain}");
    assert!(!plain.contains("\"nodes\""), "{plain}");

    let full = report_json("tick.sk", &parse, true).unwrap();
    assert!(full.contains("\"nodes\""), "{full}");
    assert!(full.contains("\"periodical\""), "{full}");
}

#[test]
fn tree_of_a_parsed_trigger() {
    let registry = default_registry_with(ParserConfig::default()).unwrap();
    let source = "\
at 6:30:
    loop 1 or 2:
        if {_i} is prime:
            print {_i}
";
    let parse = parse_script(&registry, source).unwrap();
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics);
    let tree = render_tree(&parse.nodes[0], &registry);
    let lines: Vec<&str> = tree.lines().collect();
    assert_eq!(lines[0], "event 'at time' at %*time% @1:1");
    assert_eq!(lines[1], "  0: 06:30:00 : time");
    assert_eq!(lines[2], "  section 'loop' loop %integers% @2:5");
    assert_eq!(lines[3], "    0: list (or) : integers");
    assert!(tree.contains("condition 'is prime'"), "{tree}");
}
