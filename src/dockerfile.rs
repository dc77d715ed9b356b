#![allow(clippy::module_name_repetitions)]
//! Dockerfile generation for agent images.
//!
//! The image is Debian slim + mise. Runtimes come from the project's `.tool-versions` /
//! `mise.toml` (copied in) or from a mise config synthesized from idiomatic version files.
//! Instruction order matters: the user must exist before `USER`, and the mise config must be
//! in place before `mise install`.

use std::collections::HashSet;
use std::io;

use crate::agents::{ToolSpec, IMAGE_REPOSITORY, LABEL_NAMESPACE};
use crate::collect::CollectResult;
use crate::util::tag::{image_tag_pair, sanitize_tag_component, FALLBACK_VERSION};
use crate::util::{escape_double_quote, escape_for_printf, TextLines};
use crate::versions::{ToolDescriptor, DEFAULT_VERSION};

pub const BASE_IMAGE: &str = "debian:12-slim";
const BASE_PACKAGES: &[&str] = &["curl", "ca-certificates", "git", "gnupg", "apt-transport-https"];
const LIBATOMIC_PACKAGE: &str = "libatomic1";

const AGENT_HOME: &str = "/home/agent";
const MISE_CONFIG_PATH: &str = "/home/agent/.config/mise/config.toml";
const MISE_SHIMS_PATH: &str = "/home/agent/.local/share/mise/shims:/home/agent/.local/bin";
pub const ENTRYPOINT_CONTEXT_PATH: &str = "assets/agent-entrypoint.sh";
const ENTRYPOINT_IMAGE_PATH: &str = "/usr/local/bin/agent-entrypoint";

/// `<repo>:latest` for no tools, else `<repo>:<name>-<version>-...` over sanitized pairs.
pub fn build_image_name(specs: &[ToolDescriptor]) -> String {
    if specs.is_empty() {
        return format!("{IMAGE_REPOSITORY}:latest");
    }
    let parts: Vec<String> = specs
        .iter()
        .map(|s| {
            let (name, version) = image_tag_pair(&s.name, &s.version);
            format!("{name}-{version}")
        })
        .collect();
    format!("{IMAGE_REPOSITORY}:{}", parts.join("-"))
}

/// One `LABEL` line per descriptor with a non-empty sanitized name.
pub fn build_tool_labels(specs: &[ToolDescriptor]) -> Vec<String> {
    specs
        .iter()
        .filter_map(|s| {
            let name = sanitize_tag_component(&s.name);
            if name.is_empty() {
                return None;
            }
            let mut version = sanitize_tag_component(&s.version);
            if version.is_empty() {
                version = FALLBACK_VERSION.to_string();
            }
            Some(format!("LABEL {LABEL_NAMESPACE}.{name}=\"{version}\""))
        })
        .collect()
}

/// Lines of a mise config equivalent to the idiomatic files, plus the agent's own package.
pub fn default_mise_lines(collection: &CollectResult, spec: &ToolSpec) -> Vec<String> {
    let mut lines = vec!["[tools]".to_string()];
    let mut seen: HashSet<&str> = HashSet::new();
    let mut has_agent = false;

    for info in &collection.idiomatic_infos {
        let version = info.version.trim();
        if version.is_empty() {
            continue;
        }
        let key = info.key();
        if key == spec.config_key {
            has_agent = true;
        }
        if !seen.insert(key) {
            continue;
        }
        lines.push(format!(
            "\"{}\" = \"{}\"",
            escape_double_quote(key),
            escape_double_quote(version)
        ));
    }

    if !has_agent {
        lines.push(format!(
            "\"{}\" = \"{DEFAULT_VERSION}\"",
            escape_double_quote(&spec.config_key)
        ));
    }

    lines
}

/// Render the full Dockerfile.
///
/// Fails only if a value read from the project contains a raw CR/LF/NUL, which would
/// otherwise split an instruction.
pub fn build_dockerfile(
    has_tool: bool,
    has_mise: bool,
    need_libatomic: bool,
    collection: &CollectResult,
    spec: &ToolSpec,
) -> io::Result<String> {
    let mut packages: Vec<&str> = BASE_PACKAGES.to_vec();
    if need_libatomic {
        packages.push(LIBATOMIC_PACKAGE);
    }

    let mut df = TextLines::new();
    df.push(format!("FROM {BASE_IMAGE}"))
        .push("")
        .push(format!(
            "RUN apt-get update && apt-get install -y --no-install-recommends {}",
            packages.join(" ")
        ))
        .push("RUN install -dm 755 /etc/apt/keyrings")
        .push("RUN curl -fSs https://mise.jdx.dev/gpg-key.pub | tee /etc/apt/keyrings/mise-archive-keyring.pub >/dev/null")
        .push("RUN arch=$(dpkg --print-architecture) && echo \"deb [signed-by=/etc/apt/keyrings/mise-archive-keyring.pub arch=$arch] https://mise.jdx.dev/deb stable main\" | tee /etc/apt/sources.list.d/mise.list")
        .push("RUN apt-get update && apt-get install -y mise")
        .push("RUN rm -rf /var/lib/apt/lists/*")
        .push("")
        .push("RUN groupadd -r agent && useradd -m -r -u 1000 -g agent -s /bin/bash agent")
        .push(format!("ENV HOME={AGENT_HOME}"))
        .push(format!("ENV PATH=\"{MISE_SHIMS_PATH}:${{PATH}}\""))
        .push("")
        .push("RUN mkdir -p /home/agent/.config/mise");
    df.extend(build_tool_labels(&collection.specs));
    df.push(format!("WORKDIR {AGENT_HOME}"));

    if has_tool {
        df.push("COPY .tool-versions .tool-versions");
    }

    if has_mise {
        df.push(format!("COPY mise.toml {MISE_CONFIG_PATH}"));
    } else {
        df.push("RUN printf '%s\\n' \\");
        for line in default_mise_lines(collection, spec) {
            if line.is_empty() {
                df.push("  '' \\");
            } else {
                df.push(format!("  '{}' \\", escape_for_printf(&line)));
            }
        }
        df.push(format!("  > {MISE_CONFIG_PATH}"));
    }

    if has_tool || has_mise {
        let mut chown = String::from("RUN chown agent:agent");
        if has_tool {
            chown.push_str(" .tool-versions");
        }
        chown.push(' ');
        chown.push_str(MISE_CONFIG_PATH);
        df.push(chown);
    }

    df.push(format!("COPY {ENTRYPOINT_CONTEXT_PATH} {ENTRYPOINT_IMAGE_PATH}"))
        .push(format!("RUN chmod +x {ENTRYPOINT_IMAGE_PATH}"))
        .push("USER agent")
        .push("RUN mise trust")
        .push("RUN mise install")
        .push(format!(
            "RUN printf 'export PATH=\"{MISE_SHIMS_PATH}:$PATH\"\\n' > /home/agent/.bashrc"
        ))
        .push("RUN printf 'source ~/.bashrc\\n' > /home/agent/.bash_profile")
        .push("WORKDIR /workdir")
        .push(format!(
            "ENTRYPOINT [\"/bin/bash\", \"{ENTRYPOINT_IMAGE_PATH}\"]"
        ));

    df.build_lf()
}
