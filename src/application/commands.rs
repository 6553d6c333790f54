//! Data Transfer Objects for application layer

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::application::ValidationError;
use crate::generation::{GenerationError, PackageOutcome};

/// Request to generate code for a set of package directories
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub directories: Vec<PathBuf>,
    pub parallel: bool,
}

impl GenerateRequest {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.directories.is_empty() {
            return Err(ValidationError::NoDirectories);
        }
        for directory in &self.directories {
            if !directory.is_dir() {
                return Err(ValidationError::NotADirectory(directory.clone()));
            }
        }
        Ok(())
    }

    /// Requested directories with repeats dropped, first spelling wins.
    ///
    /// Two spellings of one directory (`pkg`, `./pkg/../pkg`, a symlink) count
    /// as a repeat, so no directory is generated twice in one run.
    pub async fn distinct_directories(&self) -> Result<Vec<PathBuf>, ValidationError> {
        let mut canonical: HashSet<PathBuf> = HashSet::with_capacity(self.directories.len());
        let mut distinct = Vec::with_capacity(self.directories.len());
        for directory in &self.directories {
            let resolved = tokio::fs::canonicalize(directory)
                .await
                .map_err(|_| ValidationError::NotADirectory(directory.clone()))?;
            if canonical.insert(resolved) {
                distinct.push(directory.clone());
            }
        }
        Ok(distinct)
    }
}

/// Result for one directory
#[derive(Debug)]
pub enum DirectoryStatus {
    Completed(PackageOutcome),
    Failed(GenerationError),
    /// Skipped because the run was interrupted before it started
    Aborted,
}

#[derive(Debug)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub status: DirectoryStatus,
}

impl DirectoryReport {
    pub fn new(directory: &Path, status: DirectoryStatus) -> Self {
        Self {
            directory: directory.to_path_buf(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, DirectoryStatus::Completed(_))
    }
}

/// Response from a generation run, one report per directory in request order
#[derive(Debug, Default)]
pub struct GenerateResponse {
    pub reports: Vec<DirectoryReport>,
}

impl GenerateResponse {
    pub fn failures(&self) -> impl Iterator<Item = &DirectoryReport> {
        self.reports.iter().filter(|report| !report.is_success())
    }

    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|report| {
                matches!(
                    report.status,
                    DirectoryStatus::Completed(PackageOutcome::Written { .. })
                )
            })
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}
