//! Idiomatic per-language version files (`.nvmrc`, `.python-version`, `Gemfile`, ...).
//!
//! Each language has an ordered list of candidate files; the first one that yields a version
//! wins. Read failures count as absence.

use std::path::Path;

use tracing::debug;

use crate::util::fs::read_to_string_lossy;
use crate::util::{split_lines, trim_quote_chars};

/// A version discovered through a language's own convention file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdiomaticInfo {
    pub tool: String,
    pub version: String,
    /// Relative path of the originating file; empty for synthesized entries.
    pub path: String,
    /// Identity used to dedup against the mise config.
    pub config_key: String,
}

impl IdiomaticInfo {
    /// An entry that did not come from a file (mandatory tools added by the merge step).
    pub fn synthesized(key: &str, version: &str) -> Self {
        Self {
            tool: key.to_string(),
            version: version.to_string(),
            path: String::new(),
            config_key: key.to_string(),
        }
    }

    /// `config_key`, or `tool` when the key is blank.
    pub fn key(&self) -> &str {
        if self.config_key.is_empty() {
            &self.tool
        } else {
            &self.config_key
        }
    }
}

/// How a candidate file is turned into a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// First non-empty line, trimmed.
    FirstLine,
    /// `ruby "3.3.0"` directive inside a Gemfile.
    GemfileRuby,
    /// `java=21.0.1-tem` entry inside an `.sdkmanrc`.
    SdkmanJava,
}

impl ReadStrategy {
    pub fn for_file(file_name: &str) -> Self {
        match file_name {
            "Gemfile" => ReadStrategy::GemfileRuby,
            ".sdkmanrc" => ReadStrategy::SdkmanJava,
            _ => ReadStrategy::FirstLine,
        }
    }

    pub fn extract(self, content: &str) -> Option<String> {
        let found = match self {
            ReadStrategy::FirstLine => split_lines(content)
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string),
            ReadStrategy::GemfileRuby => split_lines(content)
                .map(str::trim)
                .find(|l| l.starts_with("ruby"))
                .and_then(|l| l.split_whitespace().nth(1))
                .map(|v| trim_quote_chars(v).to_string()),
            ReadStrategy::SdkmanJava => split_lines(content)
                .map(str::trim)
                .find_map(|l| l.strip_prefix("java="))
                .map(|v| v.trim().to_string()),
        };
        found.filter(|v| !v.is_empty())
    }
}

/// Language → candidate files, in discovery order.
pub fn idiomatic_tool_files() -> &'static [(&'static str, &'static [&'static str])] {
    &[
        ("node", &[".nvmrc", ".node-version"]),
        ("python", &[".python-version"]),
        ("ruby", &[".ruby-version", "Gemfile"]),
        ("go", &[".go-version"]),
        ("bun", &[".bun-version"]),
        ("java", &[".java-version", ".sdkmanrc"]),
    ]
}

/// Read one candidate relative to `dir` with the strategy its name selects.
pub fn read_idiomatic_version(dir: &Path, file_name: &str) -> Option<String> {
    let content = read_to_string_lossy(&dir.join(file_name))?;
    ReadStrategy::for_file(file_name).extract(&content)
}

/// Scan `dir` for idiomatic version files. At most one entry per language, in table order.
pub fn parse_idiomatic_files(dir: &Path) -> Vec<IdiomaticInfo> {
    let mut out = Vec::new();
    for (tool, candidates) in idiomatic_tool_files() {
        for candidate in candidates.iter() {
            if let Some(version) = read_idiomatic_version(dir, candidate) {
                debug!(tool = %tool, file = %candidate, version = %version, "idiomatic version file");
                out.push(IdiomaticInfo {
                    tool: tool.to_string(),
                    version,
                    path: candidate.to_string(),
                    config_key: tool.to_string(),
                });
                break;
            }
        }
    }
    out
}
