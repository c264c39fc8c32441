//! Error types for tag stores

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Store error type
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("No tag store found in the directory {} or any of its parents", .start.display())]
    StoreNotFound { start: PathBuf },

    #[error("Cannot initialize store at {}: {reason}", .path.display())]
    StoreInitConflict { path: PathBuf, reason: String },

    #[error("Duplicate file: {name} ({} and {})", .first.display(), .second.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Cannot move {} to {}: destination already exists", .from.display(), .to.display())]
    MoveCollision { from: PathBuf, to: PathBuf },

    #[error("Invalid tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: &'static str },

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
