//! Skript parser CLI entry point.

use skript_parser::{AmbiguityPolicy, ParseContext, ParserConfig, Registry, parse_script_with};
use skript_runtime::render::report_json;
use skript_runtime::{Renderer, Repl, load_config, logging, render_tree};
use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    files: Vec<PathBuf>,
    batch_mode: bool,
    show_help: bool,
    show_version: bool,
    json: bool,
    tree: bool,
    no_color: bool,
    verbosity: u8,
    config_file: Option<PathBuf>,
    max_depth: Option<usize>,
    deny_ambiguity: bool,
    strict: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::from(2)
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--json" => config.json = true,
            "--tree" => config.tree = true,
            "--no-color" => config.no_color = true,
            "--deny-ambiguity" => config.deny_ambiguity = true,
            "--strict" => config.strict = true,
            "-v" | "--verbose" => config.verbosity = config.verbosity.saturating_add(1),
            "-vv" => config.verbosity = config.verbosity.saturating_add(2),
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("--config requires a path".into());
                }
                config.config_file = Some(PathBuf::from(&args[i]));
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    return Err("--max-depth requires a value".into());
                }
                let depth: usize = args[i]
                    .parse()
                    .map_err(|_| format!("invalid --max-depth value: {}", args[i]))?;
                if depth == 0 {
                    return Err("--max-depth must be at least 1".into());
                }
                config.max_depth = Some(depth);
            }
            "-" => config.files.push(PathBuf::from("-")),
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => config.files.push(PathBuf::from(path)),
        }
        i += 1;
    }

    Ok(config)
}

/// Returns `Ok(false)` when any file had parse errors.
fn run(args: Vec<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(true);
    }

    if cli.show_version {
        println!("skript {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    logging::init(cli.verbosity);

    let mut parser_config = match &cli.config_file {
        Some(path) => load_config(path)?,
        None => ParserConfig::default(),
    };
    if let Some(depth) = cli.max_depth {
        parser_config = parser_config.with_max_depth(depth);
    }
    if cli.deny_ambiguity || cli.strict {
        parser_config = parser_config.with_ambiguity(AmbiguityPolicy::Deny);
    }
    if cli.strict {
        parser_config = parser_config.with_top_level_statements(false);
    }

    let registry = skript_stdlib::default_registry_with(parser_config)?;
    for ambiguity in registry.ambiguities() {
        warn!(
            category = %ambiguity.category,
            pattern = %ambiguity.pattern,
            existing = %ambiguity.existing,
            "ambiguous registration"
        );
    }
    info!(
        definitions = registry.definitions().len(),
        types = registry.types().len(),
        "registry ready"
    );

    let colors = !cli.no_color && !cli.json && io::stderr().is_terminal();
    let renderer = Renderer::new(colors);
    let mut clean = true;
    for file in &cli.files {
        clean &= check_file(&registry, file, &cli, renderer)?;
    }

    if cli.batch_mode {
        return Ok(clean);
    }

    let mut repl = Repl::new(registry)?.with_tree(true).with_colors(colors);
    if !cli.files.is_empty() {
        repl = repl.without_banner();
    }
    repl.run()?;
    Ok(clean)
}

/// Parses one file and prints its diagnostics. Returns false on errors.
fn check_file(
    registry: &Registry,
    file: &Path,
    cli: &CliConfig,
    renderer: Renderer,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (name, source) = if file.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        ("<stdin>".to_string(), source)
    } else {
        let source = fs::read_to_string(file)
            .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
        (file.display().to_string(), source)
    };

    let ctx = ParseContext::new(registry).with_source(name.clone());
    let parse = parse_script_with(ctx, &source)?;

    if cli.json {
        println!("{}", report_json(&name, &parse, cli.tree)?);
    } else {
        if cli.tree {
            for node in &parse.nodes {
                print!("{}", render_tree(node, registry));
            }
        }
        eprint!("{}", renderer.report(&name, &source, &parse));
        if !parse.has_errors() {
            info!(file = %name, triggers = parse.nodes.len(), "parsed cleanly");
        }
    }

    Ok(!parse.has_errors())
}

fn print_help() {
    println!(
        "\x1b[1mskript\x1b[0m - Pattern-driven parser for Skript scripts

\x1b[1mUSAGE:\x1b[0m
    skript [OPTIONS] [FILES...]

\x1b[1mARGUMENTS:\x1b[0m
    [FILES...]    Scripts to parse before starting the REPL ('-' reads stdin)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    -b, --batch            Parse files and exit (no REPL)
        --json             Print diagnostics as JSON
        --tree             Print parsed trees
        --no-color         Disable colored diagnostics
    -c, --config FILE      Load parser settings from a 'key: value' file
        --max-depth N      Limit nested sub-expression parsing
        --deny-ambiguity   Fail on indistinguishable syntax registrations
        --strict           Deny ambiguity and statements outside triggers
    -v, --verbose          More logging (repeat for more; RUST_LOG overrides)

\x1b[1mEXIT STATUS:\x1b[0m
    0  every file parsed without errors
    1  at least one file had parse errors
    2  the command itself failed

\x1b[1mEXAMPLES:\x1b[0m
    skript                            Start the REPL
    skript -b scripts/*.sk            Check scripts and exit
    skript -b --json --tree test.sk   Machine-readable trees and diagnostics
    cat test.sk | skript -b -         Check a script from stdin

\x1b[1mREPL COMMANDS:\x1b[0m
    :expr <types> <text>   Parse an expression of the given types
    :tree                  Toggle tree output
    :types, :syntax        List registered types and syntax
    :help, :quit           Help and exit
    Ctrl+D                 Exit REPL
    Ctrl+C                 Cancel current input"
    );
}
