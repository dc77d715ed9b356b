//! Version-source readers.
//!
//! Every reader turns one pinning convention into a list of descriptors. Absence and
//! malformed lines contribute nothing; none of these functions can fail.

pub mod idiomatic;
pub mod mise_toml;
pub mod tool_versions;

pub use idiomatic::{idiomatic_tool_files, parse_idiomatic_files, IdiomaticInfo, ReadStrategy};
pub use mise_toml::parse_mise_toml;
pub use tool_versions::parse_tool_versions;

/// Version used whenever a source names a tool without pinning it.
pub const DEFAULT_VERSION: &str = "latest";

/// One `(name, version)` pin. Not unique until the merge step deduplicates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub version: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}
