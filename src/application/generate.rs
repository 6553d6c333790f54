//! Use case for generating code across package directories

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinSet;

use crate::application::{
    ApplicationError, DirectoryReport, DirectoryStatus, GenerateRequest, GenerateResponse,
};
use crate::generation::{GenerationOrchestrator, error_chain};

/// Use case for generating code across package directories
pub struct GenerateUseCase {
    orchestrator: Arc<GenerationOrchestrator>,
    abort: Arc<AtomicBool>,
}

impl GenerateUseCase {
    pub fn new(orchestrator: Arc<GenerationOrchestrator>) -> Self {
        Self {
            orchestrator,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an abort flag; once set, directories not yet started are skipped
    pub fn with_abort_flag(mut self, abort: Arc<AtomicBool>) -> Self {
        self.abort = abort;
        self
    }

    pub async fn execute(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;
        let directories = request.distinct_directories().await?;

        tracing::info!(
            directories = directories.len(),
            parallel = request.parallel,
            "Starting generation"
        );

        // 2. Process each directory
        let reports = if request.parallel {
            self.run_parallel(directories).await?
        } else {
            self.run_sequential(directories).await
        };

        // 3. Report failures
        for report in &reports {
            match &report.status {
                DirectoryStatus::Failed(error) => tracing::error!(
                    directory = %report.directory.display(),
                    error = %error_chain(error),
                    "Generation failed"
                ),
                DirectoryStatus::Aborted => tracing::warn!(
                    directory = %report.directory.display(),
                    "Generation aborted"
                ),
                DirectoryStatus::Completed(_) => {}
            }
        }

        Ok(GenerateResponse { reports })
    }

    async fn run_sequential(&self, directories: Vec<PathBuf>) -> Vec<DirectoryReport> {
        let mut reports = Vec::with_capacity(directories.len());
        for directory in directories {
            let status = process(&self.orchestrator, &self.abort, &directory).await;
            reports.push(DirectoryReport::new(&directory, status));
        }
        reports
    }

    async fn run_parallel(
        &self,
        directories: Vec<PathBuf>,
    ) -> Result<Vec<DirectoryReport>, ApplicationError> {
        let mut tasks = JoinSet::new();
        for (index, directory) in directories.into_iter().enumerate() {
            let orchestrator = Arc::clone(&self.orchestrator);
            let abort = Arc::clone(&self.abort);
            tasks.spawn(async move {
                let status = process(&orchestrator, &abort, &directory).await;
                (index, DirectoryReport::new(&directory, status))
            });
        }

        let mut indexed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            indexed.push(joined?);
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, report)| report).collect())
    }
}

async fn process(
    orchestrator: &GenerationOrchestrator,
    abort: &AtomicBool,
    directory: &std::path::Path,
) -> DirectoryStatus {
    if abort.load(Ordering::SeqCst) {
        return DirectoryStatus::Aborted;
    }
    match orchestrator.generate_package(directory).await {
        Ok(outcome) => DirectoryStatus::Completed(outcome),
        Err(error) => DirectoryStatus::Failed(error),
    }
}
