//! Error mapping guide:
//! - Map io::ErrorKind::NotFound to exit code 127; an unknown agent to 2; all others to 1.
//! - Reader-level problems never reach this type: absence and malformed input are recovered
//!   where they happen and simply contribute nothing.
//! - Keep user-visible strings stable; the CLI prints them verbatim after "error: ".
use std::fmt;
use std::io;

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

#[derive(Debug)]
pub enum AgentRunError {
    /// The requested agent is not in the registry. Raised before any file or docker work.
    UnknownTool { name: String, valid: Vec<String> },
    Io(io::Error),
    /// docker build/inspect failed; carries the rendered context chain.
    Docker(String),
}

impl From<io::Error> for AgentRunError {
    fn from(e: io::Error) -> Self {
        AgentRunError::Io(e)
    }
}

impl From<anyhow::Error> for AgentRunError {
    fn from(e: anyhow::Error) -> Self {
        // Keep the io kind when the root cause is one, so exit codes stay meaningful.
        match e.downcast::<io::Error>() {
            Ok(ioe) => AgentRunError::Io(ioe),
            Err(other) => AgentRunError::Docker(format!("{other:#}")),
        }
    }
}

impl fmt::Display for AgentRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRunError::UnknownTool { name, valid } => write!(
                f,
                "invalid tool '{}'. Must be one of: {}",
                name,
                valid.join(", ")
            ),
            AgentRunError::Io(e) => write!(f, "{e}"),
            AgentRunError::Docker(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for AgentRunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentRunError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Convert AgentRunError to exit code (parity with io::Error mapping).
pub fn exit_code_for_error(e: &AgentRunError) -> u8 {
    match e {
        AgentRunError::UnknownTool { .. } => 2,
        AgentRunError::Io(ioe) => exit_code_for_io_error(ioe),
        AgentRunError::Docker(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_message_lists_valid_agents() {
        let e = AgentRunError::UnknownTool {
            name: "nope".to_string(),
            valid: vec!["codex".to_string(), "gemini".to_string()],
        };
        assert_eq!(e.to_string(), "invalid tool 'nope'. Must be one of: codex, gemini");
        assert_eq!(exit_code_for_error(&e), 2);
    }

    #[test]
    fn not_found_maps_to_127() {
        let e = AgentRunError::from(io::Error::new(io::ErrorKind::NotFound, "docker missing"));
        assert_eq!(exit_code_for_error(&e), 127);
        let other = AgentRunError::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(exit_code_for_error(&other), 1);
    }

    #[test]
    fn anyhow_io_root_keeps_kind() {
        let err = anyhow::Error::new(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(AgentRunError::from(err), AgentRunError::Io(_)));
        let msg = AgentRunError::from(anyhow::anyhow!("docker build failed"));
        assert_eq!(msg.to_string(), "docker build failed");
    }
}
