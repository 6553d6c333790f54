//! Template catalog - name → template registry for package directories
//!
//! Templates are discovered by convention: an embedded type named `Foo`
//! binds to a file named `Foo.tmpl` next to the declaring source file. The
//! catalog loads each file the first time its name is asked for and keeps the
//! parsed result (or the fact that no file exists) for its whole lifetime, so
//! a template referenced by many declarations is read and parsed once.
//!
//! A catalog is an ordinary value owned by one generation run. Nothing is
//! cached process-wide, so directories processed concurrently each work with
//! their own catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tera::Tera;
use tokio::fs;
use tracing::debug;

use crate::core::config::DEFAULT_TEMPLATE_EXTENSION;
use crate::infrastructure::templates::{TemplateError, filters};

/// A parsed template file
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    path: PathBuf,
    engine: Tera,
}

impl Template {
    /// Parse `content` as the template called `name`
    pub fn parse(name: &str, path: &Path, content: &str) -> Result<Self, TemplateError> {
        let mut engine = Tera::default();
        engine.autoescape_on(vec![]);
        filters::register(&mut engine);
        engine
            .add_raw_template(name, content)
            .map_err(|source| TemplateError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            engine,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Engine holding the parsed template under [`Template::name`]
    pub fn engine(&self) -> &Tera {
        &self.engine
    }
}

/// Lazily populated cache of templates keyed by (directory, name)
#[derive(Debug)]
pub struct TemplateCatalog {
    extension: String,
    entries: HashMap<(PathBuf, String), Option<Arc<Template>>>,
    parse_count: usize,
}

impl TemplateCatalog {
    /// Create an empty catalog looking for files with `extension`
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            entries: HashMap::new(),
            parse_count: 0,
        }
    }

    /// Look up the template `name` in `directory`.
    ///
    /// Returns `Ok(None)` when no template file exists; this is the normal
    /// outcome for embedded types that are not templates.
    pub async fn lookup(
        &mut self,
        directory: &Path,
        name: &str,
    ) -> Result<Option<Arc<Template>>, TemplateError> {
        let key = (directory.to_path_buf(), name.to_string());
        if let Some(entry) = self.entries.get(&key) {
            return Ok(entry.clone());
        }

        let entry = self.load(directory, name).await?;
        self.entries.insert(key, entry.clone());
        Ok(entry)
    }

    /// Number of template files parsed so far
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Path a template called `name` would be loaded from
    pub fn template_path(&self, directory: &Path, name: &str) -> PathBuf {
        directory.join(format!("{name}.{}", self.extension))
    }

    async fn load(
        &mut self,
        directory: &Path,
        name: &str,
    ) -> Result<Option<Arc<Template>>, TemplateError> {
        if !is_valid_template_name(name) {
            debug!(name = %name, "Ignoring embedded name that cannot be a template file");
            return Ok(None);
        }

        let path = self.template_path(directory, name);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No template for embedded type");
                return Ok(None);
            }
            Err(source) => return Err(TemplateError::Read { path, source }),
        };

        self.parse_count += 1;
        let template = Template::parse(name, &path, &content)?;
        debug!(template = %name, path = %path.display(), "Parsed template");
        Ok(Some(Arc::new(template)))
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_EXTENSION)
    }
}

/// Names that would resolve outside the directory never match a template
fn is_valid_template_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && name != ".."
}
