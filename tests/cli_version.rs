use std::process::Command;

#[test]
fn test_cli_version_includes_build_metadata() {
    let bin = env!("CARGO_BIN_EXE_agent-run");
    let out = Command::new(bin)
        .arg("--version")
        .output()
        .expect("failed to run agent-run --version");
    assert!(
        out.status.success(),
        "agent-run --version exited non-zero: {:?}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.starts_with(&format!("agent-run {}", env!("CARGO_PKG_VERSION"))),
        "unexpected version output: {stdout}"
    );
    assert!(stdout.contains("(commit: "), "{stdout}");
    assert!(stdout.contains(", built: "), "{stdout}");
}

#[test]
fn test_cli_requires_tool_argument() {
    let bin = env!("CARGO_BIN_EXE_agent-run");
    let out = Command::new(bin).output().expect("failed to run agent-run");
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("<TOOL>"));
}
