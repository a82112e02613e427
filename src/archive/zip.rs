use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use zip::{ZipArchive, ZipWriter};

use super::VfsError;
use crate::vfs::{ArchiveEntry, ArchiveIndex, EntryKind, VirtualPath};

/// Result of listing a path
#[derive(Debug)]
pub enum Listing<'a> {
    /// Immediate children of a directory, in archive order
    Directory(Vec<&'a ArchiveEntry>),
    /// The path names a single file
    File(&'a ArchiveEntry),
}

/// Virtual filesystem backed by a zip file on disk.
///
/// Reads go through an in-memory index built from the central directory.
/// Removing a directory rewrites the archive next to the original and renames
/// it into place, then reloads the index.
pub struct ZipFs {
    /// Location of the archive on disk
    path: PathBuf,
    /// Open archive handle. `None` after `close`, or after a rewrite whose
    /// reload failed; the latter is reopened on the next rewrite.
    archive: Option<ZipArchive<File>>,
    index: ArchiveIndex,
    closed: bool,
}

impl ZipFs {
    /// Open an archive and index its entries
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VfsError> {
        let path = path.as_ref().to_path_buf();
        let (archive, index) = Self::load(&path)?;
        log::debug!("Indexed {} entries from {}", index.len(), path.display());

        Ok(ZipFs {
            path,
            archive: Some(archive),
            index,
            closed: false,
        })
    }

    fn load(path: &Path) -> Result<(ZipArchive<File>, ArchiveIndex), VfsError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut records = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            records.push((entry.name().to_string(), entry.size()));
        }

        Ok((archive, ArchiveIndex::from_records(records)))
    }

    /// Location of the archive on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// Index of the open archive
    pub fn index(&self) -> Result<&ArchiveIndex, VfsError> {
        if self.closed {
            return Err(VfsError::Closed);
        }
        Ok(&self.index)
    }

    /// Kind of the node at `path`
    pub fn kind(&self, path: &VirtualPath) -> Result<EntryKind, VfsError> {
        self.index()?.kind_of(path).ok_or(VfsError::NotFound)
    }

    /// List a directory's children, or the file itself
    pub fn list(&self, path: &VirtualPath) -> Result<Listing<'_>, VfsError> {
        let index = self.index()?;
        match index.kind_of(path) {
            Some(EntryKind::Directory) => Ok(Listing::Directory(index.list_entries(path))),
            Some(EntryKind::File) => index
                .find_entry(&path.archive_key())
                .map(Listing::File)
                .ok_or(VfsError::NotFound),
            None => Err(VfsError::NotFound),
        }
    }

    /// Remove an empty directory from the archive
    pub fn remove_dir(&mut self, path: &VirtualPath) -> Result<(), VfsError> {
        let index = self.index()?;
        if path.is_root() {
            return Err(VfsError::Busy);
        }

        let key = path.dir_key();
        let entry = index.find_entry(&key).ok_or(VfsError::NotFound)?;
        if !entry.is_dir() {
            return Err(VfsError::NotADirectory);
        }
        // Implied directories always have children
        if index.has_children(path) {
            return Err(VfsError::NotEmpty);
        }

        self.rewrite_without(&key)?;
        log::info!("Removed {} from {}", key, self.path.display());
        Ok(())
    }

    /// Copy every record except the directory record `key` into a fresh
    /// archive and swap it in
    fn rewrite_without(&mut self, key: &str) -> Result<(), VfsError> {
        if self.archive.is_none() {
            let (archive, index) = Self::load(&self.path)?;
            self.archive = Some(archive);
            self.index = index;
        }
        let archive = self.archive.as_mut().ok_or(VfsError::Closed)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = ZipWriter::new(tmp.as_file());
        let mut removed = 0usize;
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            // A file record sharing the directory's name stays
            if entry.name().trim_start_matches('/') == key {
                removed += 1;
                continue;
            }
            writer.raw_copy_file(entry)?;
        }
        writer.finish()?;
        log::debug!("Rewrote archive dropping {removed} record(s) named {key}");

        tmp.persist(&self.path).map_err(|e| VfsError::Io(e.error))?;
        self.reload(key)
    }

    /// Swap in a fresh handle and index after the file on disk changed.
    ///
    /// If the new file cannot be read, the stale handle is dropped and
    /// `removed` is taken out of the in-memory index so listings match what
    /// was written. The archive stays open.
    fn reload(&mut self, removed: &str) -> Result<(), VfsError> {
        match Self::load(&self.path) {
            Ok((archive, index)) => {
                self.archive = Some(archive);
                self.index = index;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to reload {}: {}", self.path.display(), e);
                self.archive = None;
                self.index.remove(removed);
                Err(e)
            }
        }
    }

    /// Close the archive handle. Later operations fail with `Closed`.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.archive = None;
            log::debug!("Closed {}", self.path.display());
        }
    }
}
