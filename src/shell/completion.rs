use rustyline::Context;
use rustyline::completion::{Completer, Pair};
use std::sync::{Arc, RwLock};

use crate::vfs::{ArchiveIndex, PathResolver, VirtualPath};

/// What the completer can see of the session
#[derive(Debug, Clone, Default)]
struct Snapshot {
    cwd: VirtualPath,
    index: ArchiveIndex,
}

/// Session view shared between the shell and the line editor.
///
/// The editor owns the completer, so the shell pushes a fresh copy of the
/// working directory and archive index after every command.
#[derive(Clone)]
pub struct CompletionCache {
    snapshot: Arc<RwLock<Snapshot>>,
    /// Available commands
    commands: Arc<RwLock<Vec<String>>>,
}

impl CompletionCache {
    pub fn new() -> Self {
        CompletionCache {
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            commands: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the visible working directory and index
    pub fn update(&self, cwd: &VirtualPath, index: &ArchiveIndex) {
        if let Ok(mut snapshot) = self.snapshot.write() {
            snapshot.cwd = cwd.clone();
            snapshot.index = index.clone();
        }
    }

    /// Replace the list of completable command names
    pub fn set_commands(&self, mut names: Vec<String>) {
        names.sort();
        if let Ok(mut commands) = self.commands.write() {
            *commands = names;
        }
    }

    /// Get available commands
    pub fn get_commands(&self) -> Vec<String> {
        self.commands
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Entries below the directory `dir` (relative to the cwd) whose names
    /// start with `prefix`, as (name, is_dir)
    fn entries_matching(&self, dir: &str, prefix: &str) -> Vec<(String, bool)> {
        let Ok(snapshot) = self.snapshot.read() else {
            return Vec::new();
        };
        let target = PathResolver::new(&snapshot.cwd).resolve(dir);
        snapshot
            .index
            .list_entries(&target)
            .into_iter()
            .filter(|entry| entry.name().starts_with(prefix))
            .map(|entry| (entry.name().to_string(), entry.is_dir()))
            .collect()
    }
}

impl Default for CompletionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Tab completion helper for the shell
pub struct ShellCompleter {
    cache: CompletionCache,
}

impl ShellCompleter {
    pub fn new(cache: CompletionCache) -> Self {
        ShellCompleter { cache }
    }

    /// Complete a command at the start of the line
    fn complete_command(&self, word: &str) -> Vec<Pair> {
        self.cache
            .get_commands()
            .into_iter()
            .filter(|cmd| cmd.starts_with(word))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect()
    }

    /// Complete a path argument
    fn complete_path(&self, word: &str, command: &str) -> Vec<Pair> {
        // "docs/no" completes inside "docs/", "no" inside the cwd
        let (dir_part, name_prefix) = match word.rfind('/') {
            Some(slash) => word.split_at(slash + 1),
            None => ("", word),
        };
        let dirs_only = matches!(command, "cd" | "rmdir");

        self.cache
            .entries_matching(dir_part, name_prefix)
            .into_iter()
            .filter(|(_, is_dir)| *is_dir || !dirs_only)
            .map(|(name, is_dir)| {
                let suffix = if is_dir { "/" } else { "" };
                Pair {
                    display: format!("{name}{suffix}"),
                    replacement: format!("{dir_part}{name}{suffix}"),
                }
            })
            .collect()
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = words.first() else {
            return Ok((pos, self.complete_command("")));
        };

        let at_word_boundary = line.ends_with(char::is_whitespace);

        // Still typing the command name
        if words.len() == 1 && !at_word_boundary {
            return Ok((pos - command.len(), self.complete_command(command)));
        }

        let word = if at_word_boundary {
            ""
        } else {
            words.last().copied().unwrap_or("")
        };
        Ok((pos - word.len(), self.complete_path(word, command)))
    }
}

impl rustyline::Helper for ShellCompleter {}
impl rustyline::highlight::Highlighter for ShellCompleter {}
impl rustyline::hint::Hinter for ShellCompleter {
    type Hint = String;
}
impl rustyline::validate::Validator for ShellCompleter {}
