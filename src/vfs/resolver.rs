use super::VirtualPath;

/// Resolves user-supplied path strings against a working directory
pub struct PathResolver<'a> {
    cwd: &'a VirtualPath,
}

impl<'a> PathResolver<'a> {
    pub fn new(cwd: &'a VirtualPath) -> Self {
        PathResolver { cwd }
    }

    /// Resolve a path string to an absolute, normalized path.
    ///
    /// An empty string or `.` is the working directory itself, a leading `/`
    /// starts from the root, anything else is joined onto the working
    /// directory.
    pub fn resolve(&self, path: &str) -> VirtualPath {
        if path.is_empty() || path == "." {
            return self.cwd.clone();
        }
        if path.starts_with('/') {
            return VirtualPath::root().join(path);
        }
        self.cwd.join(path)
    }
}
