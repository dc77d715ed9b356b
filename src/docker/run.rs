//! The `docker run` invocation handed back to the user.

use crate::agents::ToolSpec;
use crate::util::normalize_path;

/// Home directory of the unprivileged user inside generated images.
pub const CONTAINER_HOME: &str = "/home/agent";

/// Mount point of the project directory inside the container.
pub const CONTAINER_WORKDIR: &str = "/workdir";

fn join_under(base: &str, rel: &str) -> String {
    let base = base.trim_end_matches('/');
    let rel = rel.trim_start_matches("./").trim_start_matches('/');
    if rel.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{rel}")
    }
}

/// `-e`/`-v` arguments for `spec`, in order: env vars, project mount, config mount, extras.
pub fn build_docker_run_args(spec: &ToolSpec, cwd: &str, home: &str) -> Vec<String> {
    let mut args = Vec::new();

    for env in &spec.env_vars {
        args.push("-e".to_string());
        args.push(env.clone());
    }

    args.push("-v".to_string());
    args.push(format!("{}:{CONTAINER_WORKDIR}", normalize_path(cwd)));

    let mut mount = |rel: &str| {
        args.push("-v".to_string());
        args.push(format!(
            "{}:{}",
            normalize_path(&join_under(home, rel)),
            normalize_path(&join_under(CONTAINER_HOME, rel))
        ));
    };
    mount(&spec.config_dir);
    for extra in &spec.additional_mounts {
        mount(extra);
    }

    args
}

/// Full command line: `docker run --rm -it <args> <image> <command>`.
///
/// Env values are passed through verbatim so shell substitutions in them expand when the
/// user runs the printed line.
pub fn generate_docker_run_command(image: &str, spec: &ToolSpec, cwd: &str, home: &str) -> String {
    let args = build_docker_run_args(spec, cwd, home);
    format!(
        "docker run --rm -it {} {image} {}",
        args.join(" "),
        spec.command
    )
}
