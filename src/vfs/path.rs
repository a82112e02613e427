/// Represents a normalized path in the virtual filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualPath {
    /// Path segments (e.g., ["docs", "notes", "todo.txt"])
    segments: Vec<String>,
    /// Whether this is an absolute path (starts with /)
    is_absolute: bool,
}

impl VirtualPath {
    /// The archive root, `/`
    pub fn root() -> Self {
        VirtualPath {
            segments: Vec::new(),
            is_absolute: true,
        }
    }

    /// Parse a path string into a VirtualPath, collapsing `.`, `..` and
    /// repeated separators
    pub fn parse(path: &str) -> Self {
        let base = VirtualPath {
            segments: Vec::new(),
            is_absolute: path.starts_with('/'),
        };
        base.join(path)
    }

    /// Check if this path is the root (no segments)
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Join this path with another. `..` never climbs above the first segment.
    pub fn join(&self, other: &str) -> Self {
        let mut new_segments = self.segments.clone();

        for segment in other.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            } else if segment == ".." {
                new_segments.pop();
            } else {
                new_segments.push(segment.to_string());
            }
        }

        VirtualPath {
            segments: new_segments,
            is_absolute: self.is_absolute,
        }
    }

    /// Name of this path inside the archive: no leading slash, empty for root
    pub fn archive_key(&self) -> String {
        self.segments.join("/")
    }

    /// Archive record name of this path as a directory (`docs/notes/`)
    pub fn dir_key(&self) -> String {
        if self.segments.is_empty() {
            String::new()
        } else {
            format!("{}/", self.archive_key())
        }
    }
}

impl Default for VirtualPath {
    fn default() -> Self {
        VirtualPath::root()
    }
}

impl std::fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            write!(f, "/")
        } else if self.is_absolute {
            write!(f, "/{}", self.segments.join("/"))
        } else {
            write!(f, "{}", self.segments.join("/"))
        }
    }
}
