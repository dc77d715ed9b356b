//! Agent table: which mise package provides each coding agent and how it is launched.
//!
//! The table is plain data. `ToolRegistry::builtin()` is called once by the binary and the
//! registry is handed to `run` explicitly; nothing here is global or mutable.

use crate::errors::AgentRunError;

/// Docker repository every generated image is tagged under.
pub const IMAGE_REPOSITORY: &str = "beeman/agent-run";

/// Prefix for per-tool `LABEL` keys in generated Dockerfiles.
pub const LABEL_NAMESPACE: &str = "com.beeman.agent-run";

/// Static description of one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// mise tool key that installs the agent (also the image label identity).
    pub mise_tool_name: String,
    /// Key used in the `[tools]` table of a synthesized mise config.
    pub config_key: String,
    /// Shell command run inside the container.
    pub command: String,
    /// Config directory relative to `$HOME`, bind-mounted into `/home/agent`.
    pub config_dir: String,
    pub additional_mounts: Vec<String>,
    /// Raw `KEY=value` strings passed to `docker run -e` (may contain shell substitutions).
    pub env_vars: Vec<String>,
}

impl ToolSpec {
    fn npm(package: &str, command: &str, config_dir: &str) -> Self {
        let key = format!("npm:{package}");
        Self {
            mise_tool_name: key.clone(),
            config_key: key,
            command: command.to_string(),
            config_dir: config_dir.to_string(),
            additional_mounts: Vec::new(),
            env_vars: Vec::new(),
        }
    }

    fn with_mount(mut self, mount: &str) -> Self {
        self.additional_mounts.push(mount.to_string());
        self
    }

    fn with_env(mut self, env: &str) -> Self {
        self.env_vars.push(env.to_string());
        self
    }
}

/// Ordered, immutable mapping from agent name to its spec.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    entries: Vec<(String, ToolSpec)>,
}

impl ToolRegistry {
    pub fn new(entries: Vec<(String, ToolSpec)>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            (
                "codex".to_string(),
                ToolSpec::npm(
                    "@openai/codex",
                    "codex --dangerously-bypass-approvals-and-sandbox",
                    ".codex",
                ),
            ),
            (
                "opencode".to_string(),
                ToolSpec::npm("opencode-ai", "opencode", ".config/opencode/")
                    .with_mount(".local/share/opencode"),
            ),
            (
                "copilot".to_string(),
                ToolSpec::npm(
                    "@github/copilot",
                    "copilot --allow-all-tools --allow-all-paths --allow-all-urls",
                    ".copilot",
                )
                .with_env("GH_TOKEN=\"$(gh auth token -h github.com)\""),
            ),
            (
                "gemini".to_string(),
                ToolSpec::npm("@google/gemini-cli", "gemini --yolo", ".gemini"),
            ),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Resolve an agent name case-insensitively, failing with the list of valid names.
    pub fn lookup(&self, name: &str) -> Result<&ToolSpec, AgentRunError> {
        let normalized = name.trim().to_ascii_lowercase();
        self.get(&normalized).ok_or_else(|| AgentRunError::UnknownTool {
            name: name.to_string(),
            valid: self.names(),
        })
    }
}
