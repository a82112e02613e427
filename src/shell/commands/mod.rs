use thiserror::Error;

pub mod cd;
pub mod exit;
pub mod ls;
pub mod pwd;
pub mod rmdir;

use super::Session;
use crate::archive::VfsError;

/// What a command hands back to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to display (may be empty, e.g. listing an empty directory)
    Text(String),
    /// Nothing to display
    Silent,
    /// End the session
    Exit,
}

/// A failed command, rendered the way the user sees it
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command}: {target}: {source}")]
    Path {
        command: &'static str,
        target: String,
        source: VfsError,
    },

    #[error("{command}: failed to remove '{target}': {source}")]
    Remove {
        command: &'static str,
        target: String,
        source: VfsError,
    },

    #[error("{0}: missing operand")]
    MissingOperand(&'static str),

    #[error("{command}: invalid option -- '{option}'")]
    InvalidOption { command: &'static str, option: char },
}

/// Trait for shell commands
pub trait Command: Send + Sync {
    /// Get the command name
    fn name(&self) -> &str;

    /// Get command usage help
    fn usage(&self) -> &str;

    /// Execute the command
    fn execute(&self, session: &mut Session, args: &[String]) -> Result<Reply, CommandError>;
}
