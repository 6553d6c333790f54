//! Run configuration for mixgen.
//!
//! Configuration comes from an optional `mixgen.toml` file and is then
//! overridden by command-line flags. Every field has a default so an empty
//! (or missing) file is a valid configuration.
//!
//! ```toml
//! output_file = "mixgen_gen.go"
//! template_extension = "tmpl"
//! formatter = "gofmt"
//! gofmt_command = "gofmt"
//! parallel = false
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::error::{Error, Result};

/// Default file name of the generated file written into each package
pub const DEFAULT_OUTPUT_FILE: &str = "mixgen_gen.go";

/// Default extension of template files
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tmpl";

/// Name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "mixgen.toml";

/// Formatter applied to assembled output before it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatterKind {
    /// Pipe the output through `gofmt`
    #[default]
    Gofmt,
    /// Validate with the tree-sitter Go grammar and normalise whitespace
    SyntaxCheck,
}

impl FormatterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatterKind::Gofmt => "gofmt",
            FormatterKind::SyntaxCheck => "syntax-check",
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gofmt" => Ok(FormatterKind::Gofmt),
            "syntax-check" | "syntax" | "none" => Ok(FormatterKind::SyntaxCheck),
            other => Err(Error::config(format!("unknown formatter '{other}'"))),
        }
    }
}

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File name of the generated file in each package directory
    pub output_file: String,

    /// Extension of template files, without the leading dot
    pub template_extension: String,

    /// Formatter applied to assembled output
    pub formatter: FormatterKind,

    /// Command used when `formatter` is `gofmt`
    pub gofmt_command: String,

    /// Process package directories concurrently
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            template_extension: DEFAULT_TEMPLATE_EXTENSION.to_string(),
            formatter: FormatterKind::default(),
            gofmt_command: "gofmt".to_string(),
            parallel: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = toml::from_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.output_file.ends_with(".go") {
            return Err(Error::config(format!(
                "output file '{}' must end in .go",
                self.output_file
            )));
        }
        if self.output_file.contains('/') || self.output_file.contains('\\') {
            return Err(Error::config(format!(
                "output file '{}' must be a plain file name",
                self.output_file
            )));
        }
        if self.template_extension.trim_start_matches('.').is_empty() {
            return Err(Error::config("template extension cannot be empty"));
        }
        if self.formatter == FormatterKind::Gofmt && self.gofmt_command.trim().is_empty() {
            return Err(Error::config("gofmt command cannot be empty"));
        }
        Ok(())
    }

    /// Template extension without any leading dot
    pub fn extension(&self) -> &str {
        self.template_extension.trim_start_matches('.')
    }
}
