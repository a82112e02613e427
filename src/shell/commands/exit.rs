use super::{Command, CommandError, Reply, Session};

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn usage(&self) -> &str {
        "exit - Close the archive and quit"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Result<Reply, CommandError> {
        session.close();
        Ok(Reply::Exit)
    }
}
