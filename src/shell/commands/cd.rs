use super::{Command, CommandError, Reply, Session};

pub struct CdCommand;

impl Command for CdCommand {
    fn name(&self) -> &str {
        "cd"
    }

    fn usage(&self) -> &str {
        "cd PATH - Change current directory"
    }

    fn execute(&self, session: &mut Session, args: &[String]) -> Result<Reply, CommandError> {
        let Some(path_str) = args.first() else {
            return Err(CommandError::MissingOperand("cd"));
        };

        let target = session.resolve(path_str);
        let shown = target.to_string();
        session
            .change_dir(target)
            .map_err(|source| CommandError::Path {
                command: "cd",
                target: shown,
                source,
            })?;

        Ok(Reply::Silent)
    }
}
