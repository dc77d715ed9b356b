//! The end-to-end pipeline: resolve the agent, collect pinned versions, make sure the image
//! exists, and hand back what the user should run.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::agents::ToolRegistry;
use crate::collect::{collect_tool_specs, needs_libatomic, read_pin_files};
use crate::color::{color_enabled_stderr, log_info_stderr, log_warn_stderr};
use crate::docker::{
    build_docker_context, build_image, container_runtime_path, generate_docker_run_command,
    image_exists,
};
use crate::dockerfile::{build_dockerfile, build_image_name};
use crate::errors::AgentRunError;

/// Wrapper placed at `assets/agent-entrypoint.sh` in every image: an interactive login shell
/// with no arguments, otherwise the arguments run through a login shell.
pub const ENTRYPOINT_SCRIPT: &str = "#!/bin/bash
if [ $# -eq 0 ]; then
  exec /bin/bash --login -i
else
  exec /bin/bash --login -c \"$*\"
fi
";

/// Inputs for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Agent name as typed by the user; matched case-insensitively.
    pub tool: String,
    pub debug: bool,
    /// Build even when an image with the computed name already exists.
    pub rebuild: bool,
    /// Stop after rendering the Dockerfile.
    pub dockerfile_only: bool,
    pub project_dir: PathBuf,
    pub home_dir: PathBuf,
}

/// What `run` produced; both variants are meant for stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutput {
    Dockerfile(String),
    Command(String),
}

impl RunOutput {
    pub fn as_str(&self) -> &str {
        match self {
            RunOutput::Dockerfile(s) | RunOutput::Command(s) => s,
        }
    }
}

#[instrument(level = "debug", skip(registry), fields(tool = %config.tool))]
pub fn run(config: &RunConfig, registry: &ToolRegistry) -> Result<RunOutput, AgentRunError> {
    let spec = registry.lookup(&config.tool)?;

    let (tool_file, mise_file) = read_pin_files(&config.project_dir)?;
    let collection = collect_tool_specs(
        &config.project_dir,
        tool_file.as_ref(),
        mise_file.as_ref(),
        spec,
    );
    let need_libatomic = needs_libatomic(tool_file.as_ref(), mise_file.as_ref(), &collection);

    let dockerfile = || {
        build_dockerfile(
            tool_file.is_some(),
            mise_file.is_some(),
            need_libatomic,
            &collection,
            spec,
        )
    };

    if config.dockerfile_only {
        return Ok(RunOutput::Dockerfile(dockerfile()?));
    }

    let runtime = container_runtime_path()?;
    let image = build_image_name(&collection.specs);
    debug!(image = %image, runtime = %runtime.display(), "resolved image");

    let use_color = color_enabled_stderr();
    let exists = image_exists(&runtime, &image);
    if exists && !config.rebuild {
        info!(image = %image, "reusing existing image");
    } else {
        if exists {
            log_warn_stderr(use_color, &format!("agent-run: rebuilding existing image {image}"));
        } else {
            log_info_stderr(use_color, &format!("agent-run: building image {image}"));
        }
        let context = build_docker_context(
            &dockerfile()?,
            tool_file.as_ref(),
            mise_file.as_ref(),
            &collection.idiomatic_paths,
            &config.project_dir,
            ENTRYPOINT_SCRIPT.as_bytes(),
        );
        build_image(&runtime, &context, &image, config.debug)?;
    }

    Ok(RunOutput::Command(generate_docker_run_command(
        &image,
        spec,
        &config.project_dir.to_string_lossy(),
        &config.home_dir.to_string_lossy(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(tool: &str, project_dir: PathBuf) -> RunConfig {
        RunConfig {
            tool: tool.to_string(),
            debug: false,
            rebuild: false,
            dockerfile_only: true,
            project_dir,
            home_dir: PathBuf::from("/home/user"),
        }
    }

    #[test]
    fn unknown_tool_fails_before_reading_files() {
        let cfg = config("emacs", PathBuf::from("/definitely/not/a/dir"));
        let err = run(&cfg, &ToolRegistry::builtin()).unwrap_err();
        assert!(matches!(err, AgentRunError::UnknownTool { .. }), "{err}");
        assert_eq!(
            err.to_string(),
            "invalid tool 'emacs'. Must be one of: codex, opencode, copilot, gemini"
        );
    }

    #[test]
    fn dockerfile_only_needs_no_docker() {
        let td = tempfile::tempdir().expect("tmpdir");
        std::fs::write(td.path().join(".tool-versions"), "python 3.12.0\n").unwrap();
        let out = run(&config("Codex", td.path().to_path_buf()), &ToolRegistry::builtin())
            .expect("dockerfile");
        let RunOutput::Dockerfile(df) = out else {
            panic!("expected a Dockerfile");
        };
        assert!(df.starts_with("FROM debian:12-slim"), "{df}");
        assert!(df.contains("COPY .tool-versions"), "{df}");
        assert!(!df.contains("COPY mise.toml"), "{df}");
    }

    #[test]
    fn cr_only_version_file_still_renders() {
        let td = tempfile::tempdir().expect("tmpdir");
        std::fs::write(td.path().join(".nvmrc"), "20.11.0\r# lts\r").unwrap();
        let out = run(&config("codex", td.path().to_path_buf()), &ToolRegistry::builtin())
            .expect("dockerfile");
        let df = out.as_str();
        assert!(df.contains("  '\"node\" = \"20.11.0\"' \\\n"), "{df}");
        assert!(!df.contains('\r'), "{df}");
    }

    #[test]
    fn entrypoint_execs_login_shell() {
        assert!(ENTRYPOINT_SCRIPT.starts_with("#!/bin/bash\n"));
        assert!(ENTRYPOINT_SCRIPT.contains("exec /bin/bash --login -i"));
        assert!(ENTRYPOINT_SCRIPT.contains("exec /bin/bash --login -c \"$*\""));
    }
}
