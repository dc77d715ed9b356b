//! agent-run: run AI coding agents inside a Docker image that carries the project's pinned
//! runtimes.
//!
//! Architecture
//! - Binary glue (src/main.rs) parses the CLI, sets up logging/color and calls `run`.
//! - `run` resolves the agent, collects version pins from the project directory, renders a
//!   Dockerfile, builds the image when needed and returns the `docker run` command.
//!
//! Key modules
//! - agents: the immutable agent table (`ToolRegistry`).
//! - versions::*: readers for `.tool-versions`, `mise.toml` and idiomatic version files.
//! - collect: merges all sources into one deduplicated descriptor list.
//! - dockerfile: image naming, labels and Dockerfile synthesis.
//! - docker::*: build context tarball, image inspect/build, run command.
//! - util::*: tag sanitizing, escaping, exec helper, file reading.
//!
//! Environment
//! - AGENT_RUN_LOG / RUST_LOG: tracing filter (stderr).
//! - AGENT_RUN_COLOR / NO_COLOR: color control for stderr messages.
//! - AGENT_RUN_BUILD_TIMEOUT_SECS: optional `docker build` timeout.
//! - AGENT_RUN_TEST_DISABLE_DOCKER=1: pretend docker is not installed.

pub mod agents;
pub mod collect;
pub mod color;
pub mod docker;
pub mod dockerfile;
pub mod errors;
pub mod runner;
pub mod telemetry;
pub mod util;
pub mod versions;

pub use agents::{ToolRegistry, ToolSpec, IMAGE_REPOSITORY, LABEL_NAMESPACE};
pub use collect::{collect_tool_specs, merge, needs_libatomic, read_pin_files, CollectResult};
pub use color::*;
pub use docker::{
    build_docker_context, build_image, container_runtime_path, create_tar_archive,
    generate_docker_run_command, image_exists, TarEntry,
};
pub use dockerfile::{build_dockerfile, build_image_name, build_tool_labels, default_mise_lines};
pub use errors::{exit_code_for_error, exit_code_for_io_error, AgentRunError};
pub use runner::{run, RunConfig, RunOutput, ENTRYPOINT_SCRIPT};
pub use telemetry::telemetry_init;
pub use util::fs::{optional_file_spec, FileSpec};
pub use util::tag::{image_tag_pair, sanitize_image_tag_component, sanitize_tag_component};
pub use versions::{
    parse_idiomatic_files, parse_mise_toml, parse_tool_versions, IdiomaticInfo, ToolDescriptor,
};

/// Line-pin file read from the project root.
pub const TOOL_VERSIONS_FILE: &str = ".tool-versions";

/// Declarative mise manifest read from the project root.
pub const MISE_TOML_FILE: &str = "mise.toml";

/// `<version> (commit: <sha>, built: <date>)`, with values baked in by build.rs.
pub const VERSION_STRING: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit: ",
    env!("AGENT_RUN_BUILD_COMMIT"),
    ", built: ",
    env!("AGENT_RUN_BUILD_DATE"),
    ")"
);

pub fn version_string() -> &'static str {
    VERSION_STRING
}

/// Target, profile and rustc of this build; logged at debug level on startup.
pub fn build_info() -> String {
    format!(
        "target={} profile={} rustc={}",
        env!("AGENT_RUN_BUILD_TARGET"),
        env!("AGENT_RUN_BUILD_PROFILE"),
        env!("AGENT_RUN_BUILD_RUSTC")
    )
}
