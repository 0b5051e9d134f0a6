//! `EnvironmentFile=` rendering.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::config::validate_env_entry;

/// Render `KEY=VALUE` lines, sorted by key. Values containing whitespace or
/// quotes are double-quoted the way systemd parses them.
///
/// # Errors
///
/// Returns an error if any key or value fails validation.
pub fn render(environment: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::from("# Environment for the bot service. Edit and restart the service to apply.\n");
    for (key, value) in environment {
        validate_env_entry(key, value)?;
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_value(value));
        out.push('\n');
    }
    Ok(out)
}

fn quote_value(value: &str) -> String {
    if value.is_empty() || !value.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\' | '#')) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
