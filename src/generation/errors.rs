//! Error types for the generation domain

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort generation for a package directory
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{}:{line}:{column}: syntax error: {message}", .file.display())]
    SourceParse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("package {found} in {} does not match package {expected}", .file.display())]
    PackageMismatch {
        file: PathBuf,
        expected: String,
        found: String,
    },

    #[error("failed to parse template {}: {diagnostic}", .path.display())]
    TemplateParse { path: PathBuf, diagnostic: String },

    #[error("template {template} failed for type {declaration}: {diagnostic}")]
    TemplateExecution {
        declaration: String,
        template: String,
        diagnostic: String,
    },

    #[error("generated code for package {package} is invalid: {diagnostic}\n--- generated source ---\n{source_text}")]
    OutputFormat {
        package: String,
        diagnostic: String,
        source_text: String,
    },

    #[error("failed to run formatter '{command}': {message}")]
    FormatterUnavailable { command: String, message: String },

    #[error("refusing to replace {}: not a file generated by mixgen", .path.display())]
    ForeignOutput { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parser error: {0}")]
    Parser(String),
}

impl GenerationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Render an error and all of its sources on one line.
///
/// Tera buries the useful part of a diagnostic in the source chain, so the
/// top-level message alone is rarely enough.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
