use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "agent-run",
    version = agent_run::version_string(),
    about = "Run an AI coding agent in a Docker image built from the project's pinned runtimes.",
    override_usage = "agent-run [OPTIONS] <TOOL>",
    after_long_help = "Tools:\n  codex, opencode, copilot, gemini\n\nExamples:\n  agent-run codex\n  agent-run --dockerfile gemini > Dockerfile\n  eval \"$(agent-run copilot)\"\n\n",
    after_help = "\n"
)]
pub(crate) struct Cli {
    /// Stream docker build output and log at debug level
    #[arg(long)]
    pub(crate) debug: bool,

    /// Rebuild the image even if it already exists
    #[arg(long)]
    pub(crate) rebuild: bool,

    /// Print the generated Dockerfile and exit
    #[arg(long = "dockerfile")]
    pub(crate) dockerfile_only: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub(crate) color: Option<agent_run::ColorMode>,

    /// Agent to run (codex, opencode, copilot, gemini)
    #[arg(value_name = "TOOL")]
    pub(crate) tool: String,
}
