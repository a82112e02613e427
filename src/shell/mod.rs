pub mod commands;
pub mod completion;
pub mod session;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use commands::{Command, Reply};
pub use completion::{CompletionCache, ShellCompleter};
pub use session::Session;

/// Name of the built-in help command
const HELP: &str = "help";

/// Dispatch and registry failures
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("emulator: {0}: command not found")]
    UnknownCommand(String),

    #[error("command '{0}' is registered more than once")]
    DuplicateCommand(String),

    #[error("invalid command name '{0}'")]
    InvalidCommandName(String),
}

/// Result of executing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to show (blank line, or a command with no output)
    Nothing,
    /// Command output, possibly empty
    Output(String),
    /// Formatted error message; the session carries on
    Failure(String),
    /// The session ended; the archive is closed
    Exit,
}

impl Outcome {
    /// Text to show the user, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Output(text) | Outcome::Failure(text) => Some(text),
            Outcome::Nothing | Outcome::Exit => None,
        }
    }
}

/// Command dispatcher - owns the session and the command registry
pub struct Shell {
    session: Session,
    /// Registered commands
    commands: HashMap<String, Arc<dyn Command>>,
    /// Session view for tab completion
    completion_cache: CompletionCache,
}

impl Shell {
    /// Create a shell with the standard command set
    pub fn new(session: Session) -> Result<Self, ShellError> {
        let standard: Vec<Arc<dyn Command>> = vec![
            Arc::new(commands::ls::LsCommand),
            Arc::new(commands::cd::CdCommand),
            Arc::new(commands::pwd::PwdCommand),
            Arc::new(commands::rmdir::RmdirCommand),
            Arc::new(commands::exit::ExitCommand),
        ];
        Self::with_commands(session, standard)
    }

    /// Create a shell with a specific command set, rejecting duplicate or
    /// malformed names
    pub fn with_commands(
        session: Session,
        commands: Vec<Arc<dyn Command>>,
    ) -> Result<Self, ShellError> {
        let mut shell = Shell {
            session,
            commands: HashMap::new(),
            completion_cache: CompletionCache::new(),
        };

        for command in commands {
            shell.register_command(command)?;
        }

        let mut names: Vec<String> = shell.commands.keys().cloned().collect();
        names.push(HELP.to_string());
        shell.completion_cache.set_commands(names);
        shell.refresh_completions();

        Ok(shell)
    }

    /// Register a command
    fn register_command(&mut self, command: Arc<dyn Command>) -> Result<(), ShellError> {
        let name = command.name().to_string();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ShellError::InvalidCommandName(name));
        }
        if name == HELP || self.commands.contains_key(&name) {
            return Err(ShellError::DuplicateCommand(name));
        }
        self.commands.insert(name, command);
        Ok(())
    }

    /// Execute a command line
    pub fn execute(&mut self, line: &str) -> Outcome {
        if self.session.is_closed() {
            return Outcome::Exit;
        }

        let parts: Vec<String> = line.split_whitespace().map(String::from).collect();
        let Some((cmd_name, args)) = parts.split_first() else {
            return Outcome::Nothing;
        };

        if cmd_name == HELP {
            return Outcome::Output(self.help_text());
        }

        let Some(command) = self.commands.get(cmd_name).map(Arc::clone) else {
            log::debug!("Unknown command: {cmd_name}");
            return Outcome::Failure(ShellError::UnknownCommand(cmd_name.clone()).to_string());
        };

        log::debug!("Executing {cmd_name} {args:?}");
        let outcome = match command.execute(&mut self.session, args) {
            Ok(Reply::Text(text)) => Outcome::Output(text),
            Ok(Reply::Silent) => Outcome::Nothing,
            Ok(Reply::Exit) => Outcome::Exit,
            Err(e) => {
                log::debug!("{cmd_name} failed: {e:?}");
                Outcome::Failure(e.to_string())
            }
        };

        self.refresh_completions();
        outcome
    }

    /// Run a command script, one command per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. Every outcome is
    /// passed to `on_outcome`; the script stops early on `exit`. Returns
    /// whether the session ended.
    pub fn run_script<F>(&mut self, path: &Path, mut on_outcome: F) -> std::io::Result<bool>
    where
        F: FnMut(&Outcome),
    {
        let reader = BufReader::new(File::open(path)?);

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }

            let outcome = self.execute(line);
            on_outcome(&outcome);
            if outcome == Outcome::Exit {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Whether `exit` has run
    pub fn is_finished(&self) -> bool {
        self.session.is_closed()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the completion cache
    pub fn completion_cache(&self) -> &CompletionCache {
        &self.completion_cache
    }

    fn refresh_completions(&self) {
        if let Ok(index) = self.session.fs().index() {
            self.completion_cache.update(self.session.cwd(), index);
        }
    }

    /// Usage lines for every registered command
    fn help_text(&self) -> String {
        let mut commands: Vec<_> = self.commands.values().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));

        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(commands.iter().map(|c| format!("  {}", c.usage())));
        lines.push("  help - Show this help".to_string());
        lines.join("\n")
    }

    /// Get the prompt string
    pub fn prompt(&self) -> String {
        format!("zipsh:{} $ ", self.session.cwd())
    }
}
