//! Locating the `docker` CLI.

use std::env;
use std::io;
use std::path::PathBuf;

use which::which;

/// Set to `1` to make `docker` look absent, so the no-runtime exit path can run without a daemon.
const HIDE_DOCKER_ENV: &str = "AGENT_RUN_TEST_DISABLE_DOCKER";

fn docker_hidden() -> bool {
    env::var(HIDE_DOCKER_ENV).map(|v| v == "1").unwrap_or(false)
}

/// Absolute path of `docker` on PATH, or `NotFound` (exit 127 at the CLI).
pub fn container_runtime_path() -> io::Result<PathBuf> {
    if docker_hidden() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("docker not found ({HIDE_DOCKER_ENV}=1)"),
        ));
    }
    which("docker").map_err(|_| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "docker not found in PATH; install Docker to build and run agent images",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_runtime_reports_not_found() {
        env::set_var(HIDE_DOCKER_ENV, "1");
        let err = container_runtime_path().unwrap_err();
        env::remove_var(HIDE_DOCKER_ENV);
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains(HIDE_DOCKER_ENV), "{err}");
    }
}
