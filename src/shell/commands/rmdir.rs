use super::{Command, CommandError, Reply, Session};
use crate::archive::VfsError;

pub struct RmdirCommand;

impl Command for RmdirCommand {
    fn name(&self) -> &str {
        "rmdir"
    }

    fn usage(&self) -> &str {
        "rmdir DIR - Remove an empty directory"
    }

    fn execute(&self, session: &mut Session, args: &[String]) -> Result<Reply, CommandError> {
        let Some(path_str) = args.first() else {
            return Err(CommandError::MissingOperand("rmdir"));
        };

        let target = session.resolve(path_str);
        // Any ancestor of the cwd is non-empty, so only the cwd itself is held
        let removed = if target == *session.cwd() {
            Err(VfsError::Busy)
        } else {
            session.fs_mut().remove_dir(&target)
        };
        removed.map_err(|source| CommandError::Remove {
            command: "rmdir",
            target: path_str.clone(),
            source,
        })?;

        Ok(Reply::Silent)
    }
}
