use std::collections::BTreeMap;
use std::path::Path;

use droidcfg_util::errors::DroidcfgError;

/// Loads a `.droidcfg.env` file (shell-style `KEY=value` format).
///
/// `.droidcfg.env` holds signing passwords and other secrets. Values are
/// available via `${env:VAR}` interpolation in `Droidcfg.toml`.
pub fn load_env_file(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if !path.is_file() {
        return Ok(map);
    }
    let content = std::fs::read_to_string(path).map_err(DroidcfgError::Io)?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(map)
}

/// Loads a Java-style `.properties` file such as Flutter's `local.properties`.
///
/// Supports `=` and `:` separators, `#` and `!` comments, and the common
/// backslash escapes (`\:`, `\=`, `\\`). A missing file yields an empty map.
pub fn load_properties(path: &Path) -> miette::Result<BTreeMap<String, String>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| DroidcfgError::Provider {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    Ok(parse_properties(&content))
}

/// Parse `.properties` content. See [`load_properties`].
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }
        let Some(split) = separator_index(trimmed) else {
            map.insert(unescape(trimmed), String::new());
            continue;
        };
        let key = unescape(trimmed[..split].trim());
        let value = unescape(trimmed[split + 1..].trim());
        map.insert(key, value);
    }
    map
}

/// Index of the first unescaped `=` or `:`.
fn separator_index(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '=' | ':' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Interpolate `${env:VAR}` references in a string.
///
/// Looks up values first from the provided `env_overrides` map (populated
/// from `.droidcfg.env`), then falls back to actual process environment variables.
/// Substituted text is never expanded again. An undefined variable becomes
/// an empty string and is logged as a warning.
pub fn interpolate(input: &str, env_overrides: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${env:") {
        let after = &rest[start + 6..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &after[..end];
        match env_overrides
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
        {
            Some(value) => out.push_str(&value),
            None => tracing::warn!(
                "`${{env:{key}}}` is not defined in {} or the environment; using an empty value",
                crate::ENV_FILE
            ),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

/// If `value` is exactly one `${env:VAR}` reference, return `VAR`.
pub fn env_reference(value: &str) -> Option<&str> {
    value
        .strip_prefix("${env:")
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|key| !key.is_empty() && !key.contains(['{', '}', '$']))
}
