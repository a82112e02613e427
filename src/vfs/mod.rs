pub mod node;
pub mod path;
pub mod resolver;

pub use node::{ArchiveEntry, ArchiveIndex, EntryKind};
pub use path::VirtualPath;
pub use resolver::PathResolver;
