//! Port interfaces for the generation domain

use crate::generation::GenerationError;
use async_trait::async_trait;
use std::path::Path;

/// Canonicalizes assembled Go source before it is written
#[async_trait]
pub trait SourceFormatter: Send + Sync {
    /// Format `source`, the assembled file for `package`.
    ///
    /// Source that is not valid Go must be rejected with
    /// [`GenerationError::OutputFormat`] carrying the unformatted text.
    async fn format(&self, package: &str, source: &str) -> Result<String, GenerationError>;
}

/// Persists generated files
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Replace `path` with `content` so readers see either the old or the new file
    async fn write_atomic(&self, path: &Path, content: &str) -> Result<(), GenerationError>;

    /// Remove `path`, returning whether it existed
    async fn remove_if_exists(&self, path: &Path) -> Result<bool, GenerationError>;
}
