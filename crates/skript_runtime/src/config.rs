//! Configuration files.
//!
//! A configuration file is a list of `key: value` lines. `#` starts a
//! comment, blank lines are ignored, and keys are case-insensitive with
//! spaces, dashes and underscores treated alike:
//!
//! ```text
//! # parser limits
//! max depth: 32
//! max-conversion-depth: 3
//! list separators: , | and | or
//! ambiguity: deny
//! top level statements: false
//! warn unset locals: true
//! ```

use std::fs;
use std::path::Path;

use skript_foundation::{Error, Result};
use skript_parser::script::strip_comment;
use skript_parser::{AmbiguityPolicy, ParserConfig};
use tracing::debug;

/// Reads a configuration file on top of the default configuration.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or a configuration
/// error naming the offending line.
pub fn load_config(path: &Path) -> Result<ParserConfig> {
    let text = fs::read_to_string(path)?;
    let config = parse_config(&text, ParserConfig::default())?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Applies configuration text on top of `base`.
///
/// # Errors
///
/// Returns a configuration error for a line without `:`, an unknown key or
/// a value of the wrong shape.
pub fn parse_config(text: &str, base: ParserConfig) -> Result<ParserConfig> {
    let mut config = base;
    for (index, raw) in text.lines().enumerate() {
        let line = strip_comment(raw);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let number = index + 1;
        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::config(format!(
                "line {number}: expected 'key: value', found '{line}'"
            )));
        };
        apply(&mut config, &normalize_key(key), value.trim())
            .map_err(|message| Error::config(format!("line {number}: {message}")))?;
    }
    Ok(config)
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn apply(config: &mut ParserConfig, key: &str, value: &str) -> std::result::Result<(), String> {
    match key {
        "max-depth" => config.max_depth = positive(key, value)?,
        "max-conversion-depth" => config.max_conversion_depth = positive(key, value)?,
        "list-separators" => {
            let separators: Vec<String> = value
                .split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect();
            if separators.is_empty() {
                return Err("list-separators needs at least one separator".to_string());
            }
            config.list_separators = separators;
        }
        "ambiguity" => {
            config.ambiguity = match value.to_ascii_lowercase().as_str() {
                "warn" => AmbiguityPolicy::Warn,
                "deny" => AmbiguityPolicy::Deny,
                other => return Err(format!("ambiguity must be 'warn' or 'deny', not '{other}'")),
            };
        }
        "top-level-statements" => config.allow_top_level_statements = boolean(key, value)?,
        "warn-unset-locals" => config.warn_unset_locals = boolean(key, value)?,
        other => return Err(format!("unknown key '{other}'")),
    }
    Ok(())
}

fn positive(key: &str, value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{key} must be a positive integer, not '{value}'")),
    }
}

fn boolean(key: &str, value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{key} must be true or false, not '{value}'")),
    }
}
