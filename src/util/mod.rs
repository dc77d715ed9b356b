#![allow(clippy::module_name_repetitions)]
//! Small utilities: quoting/escaping for Dockerfile and shell text, path normalization.

pub mod exec;
pub mod fs;
pub mod tag;
pub mod text_lines;

pub use text_lines::TextLines;

/// Escape a line for embedding inside a shell single-quoted string: `'` becomes `'"'"'`.
pub fn escape_for_printf(line: &str) -> String {
    line.replace('\'', "'\"'\"'")
}

/// Double every `"` so the value can sit inside a TOML/Dockerfile double-quoted string.
pub fn escape_double_quote(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Extract outer single or double quotes if the whole string is wrapped.
pub fn strip_outer_quotes(s: &str) -> String {
    if s.len() >= 2 {
        let b = s.as_bytes();
        let first = b[0] as char;
        let last = b[s.len() - 1] as char;
        if (first == '\'' && last == '\'') || (first == '"' && last == '"') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Trim any run of `'`/`"` from both ends (tolerates mismatched or unbalanced quoting).
pub fn trim_quote_chars(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

/// Split text on `\n`, `\r\n` and lone `\r` alike (old Mac line endings still show up in
/// hand-edited version files).
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
}

/// Drop trailing slashes from a host path; an all-slash path collapses to `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
