//! Application layer error types

use std::path::PathBuf;
use thiserror::Error;

/// Application layer errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{failed} of {total} directories failed")]
    DirectoriesFailed { failed: usize, total: usize },

    #[error("Generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Validation errors for requests
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("No directories to generate")]
    NoDirectories,

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
