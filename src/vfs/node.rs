use std::collections::HashMap;

use super::VirtualPath;

/// Kind of a node in the virtual filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Archive index entry - cached metadata about one path in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, without leading or trailing slash
    pub path: String,
    pub kind: EntryKind,
    /// Uncompressed size in bytes (0 for directories)
    pub size: u64,
    /// Directory with no record of its own, present because a deeper entry
    /// passes through it
    pub implied: bool,
}

impl ArchiveEntry {
    /// Last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Parent directory key ("" for top-level entries)
    fn parent_key(&self) -> &str {
        self.path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
    }
}

/// Archive index - every file and directory in the archive, in archive order.
///
/// Explicit records come first in the order the archive stores them; implied
/// directories follow in the order their first descendant appears. The root
/// is not an entry.
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    entries: Vec<ArchiveEntry>,
    positions: HashMap<String, usize>,
}

impl ArchiveIndex {
    /// Build an index from raw archive record names and sizes.
    ///
    /// Names ending in `/` are directories. Leading slashes are ignored and a
    /// repeated name keeps its first record.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut index = ArchiveIndex::default();

        for (raw_name, size) in records {
            let raw_name = raw_name.as_ref();
            let is_dir = raw_name.ends_with('/');
            let path = raw_name.trim_matches('/');
            if path.is_empty() {
                continue;
            }
            let (kind, size) = if is_dir {
                (EntryKind::Directory, 0)
            } else {
                (EntryKind::File, size)
            };
            index.push(ArchiveEntry {
                path: path.to_string(),
                kind,
                size,
                implied: false,
            });
        }

        let mut implied = Vec::new();
        for entry in &index.entries {
            let mut ancestor = entry.parent_key();
            let mut chain = Vec::new();
            while !ancestor.is_empty() {
                chain.push(ancestor.to_string());
                ancestor = ancestor.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
            }
            // Outermost ancestor first, matching the order names appear
            implied.extend(chain.into_iter().rev());
        }
        for path in implied {
            if !index.positions.contains_key(&path) {
                index.push(ArchiveEntry {
                    path,
                    kind: EntryKind::Directory,
                    size: 0,
                    implied: true,
                });
            }
        }

        index
    }

    fn push(&mut self, entry: ArchiveEntry) {
        if self.positions.contains_key(&entry.path) {
            return;
        }
        self.positions.insert(entry.path.clone(), self.entries.len());
        self.entries.push(entry);
    }

    /// Look up an entry by archive key, with or without a trailing slash
    pub fn find_entry(&self, key: &str) -> Option<&ArchiveEntry> {
        self.positions
            .get(key.trim_matches('/'))
            .map(|&pos| &self.entries[pos])
    }

    /// Kind of the node at `path`, or `None` if nothing exists there
    pub fn kind_of(&self, path: &VirtualPath) -> Option<EntryKind> {
        if path.is_root() {
            return Some(EntryKind::Directory);
        }
        self.find_entry(&path.archive_key()).map(|e| e.kind)
    }

    /// Immediate children of the directory at `path`, in index order
    pub fn list_entries(&self, path: &VirtualPath) -> Vec<&ArchiveEntry> {
        let key = path.archive_key();
        self.entries
            .iter()
            .filter(|entry| entry.parent_key() == key)
            .collect()
    }

    /// Whether the directory at `path` has any children
    pub fn has_children(&self, path: &VirtualPath) -> bool {
        let key = path.archive_key();
        self.entries.iter().any(|entry| entry.parent_key() == key)
    }

    /// Drop the entry at `key`, returning it
    pub fn remove(&mut self, key: &str) -> Option<ArchiveEntry> {
        let pos = self.positions.remove(key.trim_matches('/'))?;
        for p in self.positions.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(self.entries.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
