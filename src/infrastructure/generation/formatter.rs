//! Source formatters for assembled Go files

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

use crate::core::{Config, FormatterKind};
use crate::generation::{GenerationError, SourceFormatter};
use crate::infrastructure::golang::GoParser;
use crate::infrastructure::shell::{CommandExecutor, ProcessCommandExecutor};

static BLANK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line regex"));

/// Formatter that pipes source through `gofmt`
pub struct GofmtFormatter {
    executor: Arc<dyn CommandExecutor>,
    program: String,
    args: Vec<String>,
}

impl GofmtFormatter {
    /// `command` is split on whitespace into a program and its arguments
    pub fn new(executor: Arc<dyn CommandExecutor>, command: &str) -> Self {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next().unwrap_or_else(|| "gofmt".to_string());
        Self {
            executor,
            program,
            args: words.collect(),
        }
    }
}

#[async_trait]
impl SourceFormatter for GofmtFormatter {
    async fn format(&self, package: &str, source: &str) -> Result<String, GenerationError> {
        tracing::debug!(package = %package, command = %self.program, "Running formatter");

        let result = self
            .executor
            .execute(&self.program, &self.args, source, Path::new("."))
            .await?;

        if !result.is_success() {
            tracing::error!(
                package = %package,
                command = %self.program,
                exit_code = result.exit_code,
                "Formatter rejected generated source"
            );
            return Err(GenerationError::OutputFormat {
                package: package.to_string(),
                diagnostic: result.stderr.trim().to_string(),
                source_text: source.to_string(),
            });
        }

        Ok(result.stdout)
    }
}

/// Formatter that needs no external tool.
///
/// Validates the source with the Go grammar, then normalizes whitespace:
/// trailing blanks are stripped, runs of blank lines collapse to one and the
/// file ends with exactly one newline.
pub struct SyntaxCheckFormatter;

impl SyntaxCheckFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyntaxCheckFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFormatter for SyntaxCheckFormatter {
    async fn format(&self, package: &str, source: &str) -> Result<String, GenerationError> {
        let mut parser = GoParser::new()?;
        if let Err(error) = parser.parse_tree(Path::new("<generated>"), source) {
            let diagnostic = match error {
                GenerationError::SourceParse {
                    line,
                    column,
                    message,
                    ..
                } => format!("{line}:{column}: {message}"),
                other => other.to_string(),
            };
            return Err(GenerationError::OutputFormat {
                package: package.to_string(),
                diagnostic,
                source_text: source.to_string(),
            });
        }

        Ok(normalize_whitespace(source))
    }
}

fn normalize_whitespace(source: &str) -> String {
    let trimmed: Vec<&str> = source.lines().map(str::trim_end).collect();
    let joined = trimmed.join("\n");
    let collapsed = BLANK_RUNS.replace_all(joined.trim_matches('\n'), "\n\n");
    format!("{collapsed}\n")
}

/// Select the formatter configured for this run
pub fn select_formatter(config: &Config) -> Arc<dyn SourceFormatter> {
    match config.formatter {
        FormatterKind::Gofmt => Arc::new(GofmtFormatter::new(
            Arc::new(ProcessCommandExecutor::new()),
            &config.gofmt_command,
        )),
        FormatterKind::SyntaxCheck => Arc::new(SyntaxCheckFormatter::new()),
    }
}
