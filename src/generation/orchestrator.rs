//! Generation orchestration - coordinates the per-package workflow

use std::path::Path;
use std::sync::Arc;

use tokio::fs;

use crate::core::Config;
use crate::generation::{
    GENERATED_HEADER, GeneratedFile, GenerationError, ImportManager, OutputService,
    PackageOutcome, SourceFormatter, TemplateContext, assemble, resolve_bindings,
};
use crate::infrastructure::generation::TeraTemplateRenderer;
use crate::infrastructure::golang::PackageScanner;
use crate::infrastructure::templates::TemplateCatalog;

/// Orchestrates generation for one package directory at a time.
///
/// Holds no per-package state, so one orchestrator can serve many
/// directories concurrently.
pub struct GenerationOrchestrator {
    scanner: PackageScanner,
    renderer: TeraTemplateRenderer,
    formatter: Arc<dyn SourceFormatter>,
    output: Arc<dyn OutputService>,
    config: Config,
}

impl GenerationOrchestrator {
    /// Create a new generation orchestrator
    pub fn new(
        config: Config,
        formatter: Arc<dyn SourceFormatter>,
        output: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            scanner: PackageScanner::new(config.output_file.clone()),
            renderer: TeraTemplateRenderer::new(),
            formatter,
            output,
            config,
        }
    }

    /// Scan, render and format `directory` without touching its output file.
    ///
    /// Returns `None` when no declaration binds to a template.
    pub async fn build(&self, directory: &Path) -> Result<Option<GeneratedFile>, GenerationError> {
        // 1. Scan declarations
        let package = self.scanner.scan(directory).await?;
        let Some(package_name) = package.name.as_deref() else {
            return Ok(None);
        };

        // 2. Resolve bindings against a catalog owned by this package
        let mut catalog = TemplateCatalog::new(self.config.extension());
        let bindings = resolve_bindings(&package.declarations, &mut catalog).await?;
        if bindings.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            directory = %directory.display(),
            declarations = package.declarations.len(),
            bindings = bindings.len(),
            templates = catalog.parse_count(),
            "Resolved bindings"
        );

        // 3. Render each binding with its own context
        let mut imports = ImportManager::new();
        let mut fragments = Vec::with_capacity(bindings.len());
        for resolved in &bindings {
            let context = TemplateContext::for_binding(&resolved.binding);
            let fragment = self.renderer.render(&resolved.template, &context)?;
            imports.absorb(context.imports());
            fragments.push(fragment);
        }

        // 4. Assemble and format
        let imports = imports.finalize();
        let source = assemble(package_name, &imports, &fragments);
        let content = self.formatter.format(package_name, &source).await?;

        Ok(Some(GeneratedFile {
            path: directory.join(&self.config.output_file),
            package: package_name.to_string(),
            imports,
            fragments: fragments.len(),
            content,
        }))
    }

    /// Run the whole workflow for `directory` and persist the result.
    ///
    /// Nothing is written unless every step succeeds. A directory without
    /// bindings loses any generated file left by an earlier run. A file at the
    /// output path that mixgen did not write is never replaced or removed.
    pub async fn generate_package(
        &self,
        directory: &Path,
    ) -> Result<PackageOutcome, GenerationError> {
        let built = self.build(directory).await?;
        let target = directory.join(&self.config.output_file);
        let exists = ensure_replaceable(&target).await?;

        match built {
            Some(file) => {
                self.output.write_atomic(&file.path, &file.content).await?;
                tracing::info!(
                    directory = %directory.display(),
                    path = %file.path.display(),
                    fragments = file.fragments,
                    imports = file.imports.len(),
                    "Generated file"
                );
                Ok(PackageOutcome::Written {
                    path: file.path,
                    fragments: file.fragments,
                    imports: file.imports.len(),
                })
            }
            None => {
                let removed_stale = exists && self.output.remove_if_exists(&target).await?;
                if removed_stale {
                    tracing::info!(
                        path = %target.display(),
                        "Removed stale generated file"
                    );
                } else {
                    tracing::debug!(
                        directory = %directory.display(),
                        "No template bindings"
                    );
                }
                Ok(PackageOutcome::NoBindings { removed_stale })
            }
        }
    }
}

/// Check that `path` is absent or carries mixgen's header on its first line.
///
/// Returns whether the file exists.
async fn ensure_replaceable(path: &Path) -> Result<bool, GenerationError> {
    let content = match fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(GenerationError::io(path, e)),
    };

    let first_line = content.split(|byte| *byte == b'\n').next().unwrap_or_default();
    if first_line.strip_suffix(b"\r").unwrap_or(first_line) != GENERATED_HEADER.as_bytes() {
        return Err(GenerationError::ForeignOutput {
            path: path.to_path_buf(),
        });
    }
    Ok(true)
}
