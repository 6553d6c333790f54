//! Import bookkeeping for generated files.
//!
//! Each binding gets its own [`ImportRecorder`], which templates append to
//! through `AddImport`. Once a fragment has rendered, its recorder is drained
//! into the package-wide [`ImportManager`], which owns deduplication and
//! ordering.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Append-only list of import paths requested while rendering one binding
#[derive(Debug, Clone, Default)]
pub struct ImportRecorder {
    paths: Arc<Mutex<Vec<String>>>,
}

impl ImportRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an import path. Duplicates are kept; the manager collapses them.
    pub fn add(&self, path: impl Into<String>) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.into());
    }

    /// Paths recorded so far, in call order
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Per-package accumulator of import paths
#[derive(Debug, Default)]
pub struct ImportManager {
    paths: BTreeSet<String>,
}

impl ImportManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<String>) {
        self.paths.insert(path.into());
    }

    /// Register everything a binding's recorder collected
    pub fn absorb(&mut self, recorder: &ImportRecorder) {
        for path in recorder.paths() {
            self.register(path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Unique paths in lexicographic order
    pub fn finalize(self) -> Vec<String> {
        self.paths.into_iter().collect()
    }
}
