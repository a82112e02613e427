use crate::archive::{VfsError, ZipFs};
use crate::vfs::{EntryKind, PathResolver, VirtualPath};

/// Per-run state: where we are and the archive we are looking at
pub struct Session {
    /// Current working directory, always absolute and normalized
    cwd: VirtualPath,
    /// Archive backing the filesystem, owned exclusively by the session
    fs: ZipFs,
}

impl Session {
    /// Start a session at the archive root
    pub fn new(fs: ZipFs) -> Self {
        Session {
            cwd: VirtualPath::root(),
            fs,
        }
    }

    pub fn cwd(&self) -> &VirtualPath {
        &self.cwd
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve(&self, path: &str) -> VirtualPath {
        PathResolver::new(&self.cwd).resolve(path)
    }

    /// Move the working directory. The target must be an existing directory.
    pub fn change_dir(&mut self, path: VirtualPath) -> Result<(), VfsError> {
        match self.fs.kind(&path)? {
            EntryKind::Directory => {
                self.cwd = path;
                Ok(())
            }
            EntryKind::File => Err(VfsError::NotADirectory),
        }
    }

    pub fn fs(&self) -> &ZipFs {
        &self.fs
    }

    pub fn fs_mut(&mut self) -> &mut ZipFs {
        &mut self.fs
    }

    /// Close the archive, ending the session
    pub fn close(&mut self) {
        self.fs.close();
    }

    pub fn is_closed(&self) -> bool {
        !self.fs.is_open()
    }
}
