//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::generation::{GenerationError, OutputService};

/// Prefix of staging files; the leading dot keeps them out of package scans
pub(crate) const STAGING_PREFIX: &str = ".mixgen-";

/// Output service that writes generated files to the filesystem
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }
}

/// Stage `content` in a uniquely named sibling of `path`, then rename it over `path`.
///
/// The staging file is deleted when anything fails before the rename.
fn stage_and_persist(path: &Path, content: &str) -> Result<(), GenerationError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(".tmp")
        .tempfile_in(directory)
        .map_err(|e| GenerationError::io(directory, e))?;

    staged
        .write_all(content.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| GenerationError::io(staged.path(), e))?;

    staged
        .persist(path)
        .map_err(|e| GenerationError::io(path, e.error))?;
    Ok(())
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_atomic(&self, path: &Path, content: &str) -> Result<(), GenerationError> {
        let target: PathBuf = path.to_path_buf();
        let text = content.to_string();

        tokio::task::spawn_blocking(move || stage_and_persist(&target, &text))
            .await
            .map_err(|e| GenerationError::io(path, std::io::Error::other(e)))??;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote generated file");
        Ok(())
    }

    async fn remove_if_exists(&self, path: &Path) -> Result<bool, GenerationError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(GenerationError::io(path, e)),
        }
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}
