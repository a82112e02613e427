use super::{Command, CommandError, Reply, Session};

pub struct PwdCommand;

impl Command for PwdCommand {
    fn name(&self) -> &str {
        "pwd"
    }

    fn usage(&self) -> &str {
        "pwd - Print working directory"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Result<Reply, CommandError> {
        Ok(Reply::Text(session.cwd().to_string()))
    }
}
