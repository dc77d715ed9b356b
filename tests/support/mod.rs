/*!
Test support helpers shared across integration tests.

- project(files): a temp project directory populated with the given files
- run_bin(dir, args): run the agent-run binary with `dir` as cwd and docker disabled
- codex(): the builtin codex spec

Helpers never touch docker; tests that need a daemon are not part of this suite.
*/

use std::path::Path;
use std::process::{Command, Output};

/// Create a temp dir and write `(relative path, contents)` pairs into it.
#[allow(dead_code)]
pub fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let td = tempfile::tempdir().expect("tmpdir");
    for (name, contents) in files {
        let path = td.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(&path, contents).expect("write fixture");
    }
    td
}

/// Run the binary in `dir`. Docker detection is disabled so nothing can reach a daemon.
#[allow(dead_code)]
pub fn run_bin(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_agent-run"))
        .args(args)
        .current_dir(dir)
        .env("AGENT_RUN_TEST_DISABLE_DOCKER", "1")
        .env("NO_COLOR", "1")
        .env_remove("AGENT_RUN_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run agent-run")
}

#[allow(dead_code)]
pub fn codex() -> agent_run::ToolSpec {
    agent_run::ToolRegistry::builtin()
        .get("codex")
        .cloned()
        .expect("codex spec")
}

/// Render an Output for assertion messages.
#[allow(dead_code)]
pub fn describe(out: &Output) -> String {
    format!(
        "status: {:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}
