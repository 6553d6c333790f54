//! Error types for the template infrastructure layer

use std::path::PathBuf;
use thiserror::Error;

use crate::generation::{GenerationError, error_chain};

/// Errors that can occur while loading templates
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template file exists but could not be read
    #[error("Failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template file exists but is not a valid template
    #[error("Failed to parse template {}: {}", .path.display(), error_chain(.source))]
    Parse {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },
}

impl From<TemplateError> for GenerationError {
    fn from(error: TemplateError) -> Self {
        match error {
            TemplateError::Read { path, source } => GenerationError::Io { path, source },
            TemplateError::Parse { path, source } => GenerationError::TemplateParse {
                path,
                diagnostic: error_chain(&source),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_converts_to_template_parse() {
        let mut tera = tera::Tera::default();
        let source = tera.add_raw_template("Broken", "{{ Name").unwrap_err();
        let error = TemplateError::Parse {
            path: PathBuf::from("pkg/Broken.tmpl"),
            source,
        };

        match GenerationError::from(error) {
            GenerationError::TemplateParse { path, diagnostic } => {
                assert_eq!(path, PathBuf::from("pkg/Broken.tmpl"));
                assert!(!diagnostic.is_empty());
            }
            other => panic!("Expected TemplateParse, got {:?}", other),
        }
    }
}
