//! `.tool-versions` reader (asdf/mise line-pin format).

use super::{ToolDescriptor, DEFAULT_VERSION};
use crate::util::fs::FileSpec;
use crate::util::split_lines;

/// One tool per non-blank, non-comment line: `<name> [<version>] [ignored...]`.
pub fn parse_tool_versions(file: Option<&FileSpec>) -> Vec<ToolDescriptor> {
    let Some(file) = file else {
        return Vec::new();
    };

    split_lines(&file.text())
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(|l| {
            let mut tokens = l.split_whitespace();
            let name = tokens.next()?;
            let version = tokens.next().unwrap_or(DEFAULT_VERSION);
            Some(ToolDescriptor::new(name, version))
        })
        .collect()
}
