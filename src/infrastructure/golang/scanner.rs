//! Package scanner - reads every Go source file in a directory
//!
//! This scanner handles file discovery and I/O. The actual parsing is done by
//! the [`GoParser`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::parser::GoParser;
use crate::generation::{GenerationError, ScannedPackage};

/// Standard marker of machine-generated Go files
static GENERATED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^// Code generated .* DO NOT EDIT\.$").expect("generated-file marker regex")
});

/// Build constraint that excludes a file from every build (`go run gen.go` helpers)
static BUILD_IGNORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^//(?:go:build| ?\+build)\s+ignore$").expect("build-ignore constraint regex")
});

/// Scans package directories into declarations
#[derive(Debug, Clone)]
pub struct PackageScanner {
    output_file: String,
}

impl PackageScanner {
    /// Create a scanner that skips the generator's own `output_file`
    pub fn new(output_file: impl Into<String>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// Whether `file_name` is a hand-written source file of the package
    pub fn is_source_file(&self, file_name: &str) -> bool {
        file_name.ends_with(".go")
            && !file_name.ends_with("_test.go")
            && !file_name.starts_with('.')
            && !file_name.starts_with('_')
            && file_name != self.output_file
    }

    /// Scan every source file of `directory`, in file-name order
    pub async fn scan(&self, directory: &Path) -> Result<ScannedPackage, GenerationError> {
        let mut files = self.source_files(directory).await?;
        files.sort();

        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let content = fs::read_to_string(&file)
                .await
                .map_err(|e| GenerationError::io(&file, e))?;
            if is_generated(&content) {
                debug!(file = %file.display(), "Skipping generated file");
                continue;
            }
            if is_build_ignored(&content) {
                debug!(file = %file.display(), "Skipping build-ignored file");
                continue;
            }
            sources.push((file, content));
        }

        let mut parser = GoParser::new()?;
        let mut package = ScannedPackage {
            directory: directory.to_path_buf(),
            ..Default::default()
        };

        for (file, content) in sources {
            let parsed = parser.parse_file(&file, &content)?;
            let expected = package
                .name
                .get_or_insert_with(|| parsed.package.clone());
            if *expected != parsed.package {
                return Err(GenerationError::PackageMismatch {
                    file,
                    expected: expected.clone(),
                    found: parsed.package,
                });
            }

            debug!(
                file = %file.display(),
                declarations = parsed.declarations.len(),
                "Scanned source file"
            );
            package.declarations.extend(parsed.declarations);
            package.files.push(file);
        }

        Ok(package)
    }

    async fn source_files(&self, directory: &Path) -> Result<Vec<PathBuf>, GenerationError> {
        let mut entries = fs::read_dir(directory)
            .await
            .map_err(|e| GenerationError::io(directory, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| GenerationError::io(directory, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| GenerationError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let name = entry.file_name();
            if name.to_str().is_some_and(|name| self.is_source_file(name)) {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

/// Whether `content` carries the generated-code marker before its package clause
pub fn is_generated(content: &str) -> bool {
    content
        .lines()
        .take_while(|line| !line.trim_start().starts_with("package "))
        .any(|line| GENERATED_MARKER.is_match(line.trim_end()))
}

/// Whether `content` is constrained out of every build before its package clause
pub fn is_build_ignored(content: &str) -> bool {
    content
        .lines()
        .take_while(|line| !line.trim_start().starts_with("package "))
        .any(|line| BUILD_IGNORE.is_match(line.trim()))
}
