//! `mise.toml` reader.
//!
//! Only two shapes are recognized: the `[tools]` table of `key = "value"` pairs and
//! repeated `[[tool]]` records carrying `name`/`version`. This is a line scanner, not a
//! TOML parser; anything it does not understand is skipped.

use super::ToolDescriptor;
use crate::util::fs::FileSpec;
use crate::util::{split_lines, strip_outer_quotes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Tools,
    ToolRecord,
}

/// The value part without a trailing `# comment`. A quoted value ends at its closing quote.
fn value_text(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.chars().next() {
        Some(q @ ('"' | '\'')) => match raw[1..].find(q) {
            Some(end) => &raw[..end + 2],
            None => raw,
        },
        _ => raw.split(" #").next().unwrap_or(raw).trim(),
    }
}

/// Split `key = value` and unquote both halves. `None` for lines without `=` or with an
/// empty key/value.
fn key_value(line: &str) -> Option<(String, String)> {
    let (k, v) = line.split_once('=')?;
    let key = strip_outer_quotes(k.trim());
    let value = strip_outer_quotes(value_text(v));
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

pub fn parse_mise_toml(file: Option<&FileSpec>) -> Vec<ToolDescriptor> {
    let Some(file) = file else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut section = Section::None;
    let mut name: Option<String> = None;
    let mut version: Option<String> = None;

    for raw in split_lines(&file.text()) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = line.split('#').next().unwrap_or(line).trim();
            section = match header {
                "[tools]" => Section::Tools,
                "[[tool]]" => Section::ToolRecord,
                _ => Section::None,
            };
            // A new header always starts a fresh record; half-filled ones are dropped.
            name = None;
            version = None;
            continue;
        }

        let Some((key, value)) = key_value(line) else {
            continue;
        };

        match section {
            Section::None => {}
            Section::Tools => out.push(ToolDescriptor::new(key, value)),
            Section::ToolRecord => {
                match key.as_str() {
                    "name" => name = Some(value),
                    "version" => version = Some(value),
                    _ => {}
                }
                if let (Some(n), Some(v)) = (&name, &version) {
                    out.push(ToolDescriptor::new(n.clone(), v.clone()));
                    name = None;
                    version = None;
                }
            }
        }
    }

    out
}
