pub mod zip;

use thiserror::Error;

pub use self::zip::{Listing, ZipFs};

/// Failures of the archive-backed filesystem.
///
/// The messages of the path-related variants are the reasons shown to the
/// user after the command prefix (e.g. `ls: /x: No such file or directory`).
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("No such file or directory")]
    NotFound,

    #[error("Not a directory")]
    NotADirectory,

    #[error("Directory not empty")]
    NotEmpty,

    #[error("Device or resource busy")]
    Busy,

    #[error("Archive is closed")]
    Closed,

    #[error("{0}")]
    Zip(#[from] ::zip::result::ZipError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
