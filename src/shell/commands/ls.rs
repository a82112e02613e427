use super::{Command, CommandError, Reply, Session};
use crate::archive::Listing;
use crate::vfs::ArchiveEntry;

pub struct LsCommand;

impl Command for LsCommand {
    fn name(&self) -> &str {
        "ls"
    }

    fn usage(&self) -> &str {
        "ls [-l] [PATH] - List directory contents"
    }

    fn execute(&self, session: &mut Session, args: &[String]) -> Result<Reply, CommandError> {
        let mut long_format = false;
        let mut path_arg: Option<&str> = None;

        for arg in args {
            if let Some(flags) = arg.strip_prefix('-')
                && !flags.is_empty()
            {
                for flag in flags.chars() {
                    match flag {
                        'l' => long_format = true,
                        other => {
                            return Err(CommandError::InvalidOption {
                                command: "ls",
                                option: other,
                            });
                        }
                    }
                }
            } else if path_arg.is_none() {
                path_arg = Some(arg.as_str());
            }
        }

        let shown = path_arg.unwrap_or(".");
        let target = session.resolve(path_arg.unwrap_or(""));

        let listing = session
            .fs()
            .list(&target)
            .map_err(|source| CommandError::Path {
                command: "ls",
                target: shown.to_string(),
                source,
            })?;

        let entries = match listing {
            Listing::Directory(entries) => entries,
            Listing::File(entry) => vec![entry],
        };

        let output = if long_format {
            Self::format_long(&entries)
        } else {
            entries
                .iter()
                .map(|entry| entry.name())
                .collect::<Vec<_>>()
                .join("\n")
        };

        Ok(Reply::Text(output))
    }
}

impl LsCommand {
    /// One line per entry with a size column, directories marked with `/`
    fn format_long(entries: &[&ArchiveEntry]) -> String {
        let mut lines = vec![
            format!("{:<50} {:>12}", "NAME", "SIZE"),
            "-".repeat(63),
        ];

        for entry in entries {
            let (display_name, size_str) = if entry.is_dir() {
                (format!("{}/", entry.name()), "-".to_string())
            } else {
                (
                    entry.name().to_string(),
                    humansize::format_size(entry.size, humansize::BINARY),
                )
            };
            lines.push(format!("{display_name:<50} {size_str:>12}"));
        }

        lines.join("\n")
    }
}
