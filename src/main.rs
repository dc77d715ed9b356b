use std::env;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use agent_run::{
    color_enabled_stderr, exit_code_for_error, log_error_stderr, run, telemetry_init,
    AgentRunError, RunConfig, ToolRegistry,
};

mod cli;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(mode) = cli.color {
        agent_run::set_color_mode(mode);
    }
    telemetry_init(cli.debug);
    debug!(build = %agent_run::build_info(), "agent-run {}", agent_run::version_string());

    match run_cli(&cli) {
        Ok(out) => {
            println!("{}", out.as_str().trim_end_matches('\n'));
            ExitCode::from(0)
        }
        Err(e) => {
            log_error_stderr(color_enabled_stderr(), &format!("error: {e}"));
            ExitCode::from(exit_code_for_error(&e))
        }
    }
}

fn run_cli(cli: &Cli) -> Result<agent_run::RunOutput, AgentRunError> {
    let project_dir = env::current_dir()?;
    let home_dir = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine the home directory",
        )
    })?;

    // Built once; `run` only ever borrows it.
    let registry = ToolRegistry::builtin();
    let config = RunConfig {
        tool: cli.tool.clone(),
        debug: cli.debug,
        rebuild: cli.rebuild,
        dockerfile_only: cli.dockerfile_only,
        project_dir,
        home_dir,
    };
    run(&config, &registry)
}
