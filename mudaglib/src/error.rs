//! Error types for mudaglib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning and counting workflow files
#[derive(Error, Debug)]
pub enum MudagError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The ignore configuration file does not exist
    #[error("ignore file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The ignore configuration file exists but could not be read
    #[error("failed to read ignore file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Scan root is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Not a recognized workflow file
    #[error("not a workflow file: {0}")]
    UnsupportedLanguage(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
