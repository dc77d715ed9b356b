//! Merge of all version sources into one deduplicated tool manifest.
//!
//! Precedence is source order: `.tool-versions`, then `mise.toml`, then idiomatic files.
//! Dedup keeps the first descriptor per sanitized name. Two entries are always present
//! afterwards: the agent's own mise package and `node` (the entrypoint and the npm-hosted
//! agents need a JavaScript runtime).

use std::collections::HashSet;
use std::io;
use std::path::Path;

use tracing::{debug, instrument};

use crate::agents::ToolSpec;
use crate::util::fs::FileSpec;
use crate::util::tag::sanitize_tag_component;
use crate::versions::{
    parse_idiomatic_files, parse_mise_toml, parse_tool_versions, IdiomaticInfo, ToolDescriptor,
    DEFAULT_VERSION,
};

pub const NODE_TOOL: &str = "node";

/// Everything the Dockerfile generator and the build context need from the project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectResult {
    /// Unique by sanitized name, discovery order.
    pub specs: Vec<ToolDescriptor>,
    /// Idiomatic files to ship in the build context; unique, non-empty, in order.
    pub idiomatic_paths: Vec<String>,
    pub idiomatic_infos: Vec<IdiomaticInfo>,
}

impl CollectResult {
    pub fn has_tool(&self, name: &str) -> bool {
        let wanted = sanitize_tag_component(name);
        self.specs
            .iter()
            .any(|d| sanitize_tag_component(&d.name) == wanted)
    }
}

fn dedup_descriptors(all: Vec<ToolDescriptor>) -> Vec<ToolDescriptor> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(all.len());
    for d in all {
        let key = sanitize_tag_component(&d.name);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        let version = d.version.trim();
        let version = if version.is_empty() {
            DEFAULT_VERSION.to_string()
        } else {
            version.to_string()
        };
        out.push(ToolDescriptor::new(d.name, version));
    }
    out
}

fn ensure_descriptor(specs: &mut Vec<ToolDescriptor>, name: &str) {
    let wanted = sanitize_tag_component(name);
    if !specs
        .iter()
        .any(|d| sanitize_tag_component(&d.name) == wanted)
    {
        debug!(tool = %name, "adding mandatory tool at {DEFAULT_VERSION}");
        specs.push(ToolDescriptor::new(name, DEFAULT_VERSION));
    }
}

fn ensure_idiomatic(infos: &mut Vec<IdiomaticInfo>, key: &str) {
    if !infos.iter().any(|i| i.key() == key) {
        infos.push(IdiomaticInfo::synthesized(key, DEFAULT_VERSION));
    }
}

fn unique_paths(infos: &[IdiomaticInfo]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    infos
        .iter()
        .map(|i| i.path.as_str())
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .map(str::to_string)
        .collect()
}

/// Combine already-parsed sources. Pure; does not touch the filesystem.
pub fn merge(
    tool_versions: Vec<ToolDescriptor>,
    mise: Vec<ToolDescriptor>,
    idiomatic: Vec<IdiomaticInfo>,
    spec: &ToolSpec,
) -> CollectResult {
    let mut all = tool_versions;
    all.extend(mise);
    all.extend(
        idiomatic
            .iter()
            .filter(|i| !i.version.trim().is_empty())
            .map(|i| ToolDescriptor::new(i.key(), i.version.trim())),
    );

    let mut specs = dedup_descriptors(all);
    ensure_descriptor(&mut specs, &spec.mise_tool_name);
    ensure_descriptor(&mut specs, NODE_TOOL);

    let mut idiomatic_infos = idiomatic;
    ensure_idiomatic(&mut idiomatic_infos, &spec.config_key);
    ensure_idiomatic(&mut idiomatic_infos, NODE_TOOL);

    let idiomatic_paths = unique_paths(&idiomatic_infos);

    CollectResult {
        specs,
        idiomatic_paths,
        idiomatic_infos,
    }
}

/// Parse every source for the project rooted at `project_dir` and merge them.
#[instrument(level = "debug", skip_all, fields(agent = %spec.mise_tool_name))]
pub fn collect_tool_specs(
    project_dir: &Path,
    tool_file: Option<&FileSpec>,
    mise_file: Option<&FileSpec>,
    spec: &ToolSpec,
) -> CollectResult {
    let from_tool_versions = parse_tool_versions(tool_file);
    let from_mise = parse_mise_toml(mise_file);
    let idiomatic = parse_idiomatic_files(project_dir);
    debug!(
        tool_versions = from_tool_versions.len(),
        mise = from_mise.len(),
        idiomatic = idiomatic.len(),
        "collected version sources"
    );
    merge(from_tool_versions, from_mise, idiomatic, spec)
}

fn bytes_mention_node(data: &[u8]) -> bool {
    let needle = NODE_TOOL.as_bytes();
    data.windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}

/// Whether the image needs `libatomic1` (Node's prebuilt binaries link against it and slim
/// Debian images lack it).
pub fn needs_libatomic(
    tool_file: Option<&FileSpec>,
    mise_file: Option<&FileSpec>,
    collection: &CollectResult,
) -> bool {
    tool_file.is_some_and(|f| bytes_mention_node(&f.data))
        || mise_file.is_some_and(|f| bytes_mention_node(&f.data))
        || collection.has_tool(NODE_TOOL)
}

/// Read `.tool-versions` and `mise.toml` from the project directory.
pub fn read_pin_files(project_dir: &Path) -> io::Result<(Option<FileSpec>, Option<FileSpec>)> {
    let tool_file = crate::util::fs::optional_file_spec(project_dir, crate::TOOL_VERSIONS_FILE)?;
    let mise_file = crate::util::fs::optional_file_spec(project_dir, crate::MISE_TOML_FILE)?;
    Ok((tool_file, mise_file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::ToolRegistry;

    fn codex() -> ToolSpec {
        ToolRegistry::builtin().get("codex").cloned().expect("codex")
    }

    fn td(name: &str, version: &str) -> ToolDescriptor {
        ToolDescriptor::new(name, version)
    }

    #[test]
    fn first_occurrence_wins_case_insensitive() {
        let r = merge(vec![td("Node", "18"), td("node", "20")], vec![], vec![], &codex());
        let nodes: Vec<_> = r
            .specs
            .iter()
            .filter(|d| d.name.eq_ignore_ascii_case("node"))
            .collect();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].version, "18");
    }

    #[test]
    fn tool_versions_beats_mise_beats_idiomatic() {
        let idiomatic = vec![IdiomaticInfo {
            tool: "python".into(),
            version: "3.10".into(),
            path: ".python-version".into(),
            config_key: "python".into(),
        }];
        let r = merge(
            vec![td("python", "3.12")],
            vec![td("python", "3.11"), td("go", "1.22")],
            idiomatic,
            &codex(),
        );
        assert_eq!(
            r.specs,
            vec![
                td("python", "3.12"),
                td("go", "1.22"),
                td("npm:@openai/codex", "latest"),
                td("node", "latest"),
            ]
        );
    }

    #[test]
    fn mandatory_entries_added_once() {
        let r = merge(vec![], vec![], vec![], &codex());
        assert_eq!(
            r.specs,
            vec![td("npm:@openai/codex", "latest"), td("node", "latest")]
        );
        assert_eq!(
            r.idiomatic_infos,
            vec![
                IdiomaticInfo::synthesized("npm:@openai/codex", "latest"),
                IdiomaticInfo::synthesized("node", "latest"),
            ]
        );
        assert!(r.idiomatic_paths.is_empty());
    }

    #[test]
    fn existing_agent_pin_is_kept() {
        let r = merge(
            vec![],
            vec![td("npm:@openai/codex", "0.5.0"), td("NODE", "22")],
            vec![],
            &codex(),
        );
        assert_eq!(
            r.specs,
            vec![td("npm:@openai/codex", "0.5.0"), td("NODE", "22")]
        );
    }

    #[test]
    fn idiomatic_node_satisfies_mirror_invariant() {
        let idiomatic = vec![IdiomaticInfo {
            tool: "node".into(),
            version: "20.11.0".into(),
            path: ".nvmrc".into(),
            config_key: "node".into(),
        }];
        let r = merge(vec![], vec![], idiomatic, &codex());
        assert_eq!(r.idiomatic_infos.len(), 2);
        assert_eq!(r.idiomatic_infos[0].path, ".nvmrc");
        assert_eq!(r.idiomatic_infos[1].config_key, "npm:@openai/codex");
        assert_eq!(r.idiomatic_paths, vec![".nvmrc".to_string()]);
        assert_eq!(r.specs[0], td("node", "20.11.0"));
    }

    #[test]
    fn empty_versions_and_names() {
        let r = merge(vec![td("ruby", "  "), td("@@", "1")], vec![], vec![], &codex());
        assert_eq!(r.specs[0], td("ruby", "latest"));
        assert!(!r.specs.iter().any(|d| d.name == "@@"));
    }

    #[test]
    fn idiomatic_without_version_contributes_no_descriptor() {
        let idiomatic = vec![IdiomaticInfo {
            tool: "go".into(),
            version: "".into(),
            path: ".go-version".into(),
            config_key: "go".into(),
        }];
        let r = merge(vec![], vec![], idiomatic, &codex());
        assert!(!r.has_tool("go"));
        assert_eq!(r.idiomatic_paths, vec![".go-version".to_string()]);
    }

    #[test]
    fn paths_are_unique_and_ordered() {
        let mk = |tool: &str, path: &str| IdiomaticInfo {
            tool: tool.into(),
            version: "1".into(),
            path: path.into(),
            config_key: tool.into(),
        };
        let r = merge(
            vec![],
            vec![],
            vec![mk("a", "x"), mk("b", ""), mk("c", "y"), mk("d", "x")],
            &codex(),
        );
        assert_eq!(r.idiomatic_paths, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn libatomic_signals() {
        let empty = CollectResult::default();
        let tv = FileSpec::new(".tool-versions", b"NodeJS 20\n".to_vec(), 0o644);
        let mise = FileSpec::new("mise.toml", b"[tools]\npython = \"3\"\n".to_vec(), 0o644);
        assert!(needs_libatomic(Some(&tv), None, &empty));
        assert!(!needs_libatomic(None, Some(&mise), &empty));
        assert!(!needs_libatomic(None, None, &empty));

        let with_node = merge(vec![], vec![], vec![], &codex());
        assert!(needs_libatomic(None, None, &with_node));
    }

    #[test]
    fn libatomic_from_mise_bytes_alone() {
        let empty = CollectResult::default();
        assert!(!empty.has_tool("node"));
        let mise = FileSpec::new("mise.toml", b"[tools]\nNode = \"20\"\n".to_vec(), 0o644);
        assert!(needs_libatomic(None, Some(&mise), &empty));
    }

    #[test]
    fn collects_from_directory() {
        let dir = tempfile::tempdir().expect("tmpdir");
        std::fs::write(dir.path().join(".tool-versions"), "python 3.12.0\n").unwrap();
        std::fs::write(dir.path().join(".nvmrc"), "20.11.0\n").unwrap();
        let (tool_file, mise_file) = read_pin_files(dir.path()).unwrap();
        assert!(mise_file.is_none());

        let r = collect_tool_specs(dir.path(), tool_file.as_ref(), mise_file.as_ref(), &codex());
        assert_eq!(
            r.specs,
            vec![
                td("python", "3.12.0"),
                td("node", "20.11.0"),
                td("npm:@openai/codex", "latest"),
            ]
        );
        assert_eq!(r.idiomatic_paths, vec![".nvmrc".to_string()]);
    }
}
