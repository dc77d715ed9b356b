#![allow(clippy::module_name_repetitions)]
//! `docker build` driven by an in-memory build context.

use std::env;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{info, instrument};

use crate::util::exec::{ExecRequest, ExecService};

/// Optional build timeout from AGENT_RUN_BUILD_TIMEOUT_SECS; unset, empty or invalid means
/// no timeout.
pub fn build_timeout_from_env() -> Duration {
    env::var("AGENT_RUN_BUILD_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::ZERO)
}

/// Last few lines of docker's stderr, enough to explain a failure without flooding.
fn stderr_tail(stderr: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

/// Run `docker build -t <image> --rm --force-rm -f Dockerfile -` with `context` on stdin.
///
/// The context is staged in a temp dir that is removed when this returns. With `debug`
/// docker's output is streamed to our stderr (stdout stays reserved for the run command);
/// otherwise it is captured and only shown on failure.
#[instrument(level = "debug", skip(context, debug), fields(context_bytes = context.len()))]
pub fn build_image(runtime: &Path, context: &[u8], image: &str, debug: bool) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix("agent-run-")
        .tempdir()
        .context("failed to create staging directory for build context")?;
    let context_path = staging.path().join("context.tar");
    {
        let mut f = std::fs::File::create(&context_path)
            .with_context(|| format!("failed to create {}", context_path.display()))?;
        f.write_all(context)
            .with_context(|| format!("failed to write {}", context_path.display()))?;
    }

    info!(image = %image, "building image");
    let request = ExecRequest::new(runtime)
        .args(["build", "-t", image, "--rm", "--force-rm", "-f", "Dockerfile", "-"])
        .stdin_file(&context_path)
        .capture_output(!debug)
        .stdout_to_stderr(true);
    let out = ExecService::new(build_timeout_from_env()).run(request)?;

    if out.status.success() {
        info!(image = %image, elapsed = ?out.duration, "image built");
        return Ok(());
    }

    let code = out
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());
    let tail = stderr_tail(&out.stderr, 20);
    if tail.is_empty() {
        Err(anyhow!("docker build for {image} failed (exit {code})"))
    } else {
        Err(anyhow!("docker build for {image} failed (exit {code}):\n{tail}"))
    }
}
