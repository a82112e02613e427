pub mod archive;
pub mod config;
pub mod shell;
pub mod vfs;
