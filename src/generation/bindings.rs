//! Binding resolution - pairs declarations with the templates they embed

use std::sync::Arc;

use crate::generation::{Declaration, GenerationError, TemplateBinding};
use crate::infrastructure::templates::{Template, TemplateCatalog};

/// A binding together with the template it resolved to
#[derive(Debug, Clone)]
pub struct ResolvedBinding<'a> {
    pub binding: TemplateBinding<'a>,
    pub template: Arc<Template>,
}

/// Resolve every declaration against `catalog`.
///
/// Bindings come out in declaration order and, within a declaration, in
/// order of each embedded name's first appearance. Each declaration is looked
/// up in its own directory.
pub async fn resolve_bindings<'a>(
    declarations: &'a [Declaration],
    catalog: &mut TemplateCatalog,
) -> Result<Vec<ResolvedBinding<'a>>, GenerationError> {
    let mut resolved = Vec::new();

    for declaration in declarations {
        for name in declaration.distinct_embedded() {
            let Some(template) = catalog.lookup(declaration.directory(), name).await? else {
                continue;
            };

            let binding = TemplateBinding {
                declaration,
                template: name.to_string(),
            };
            tracing::debug!(binding = %binding, "Resolved template binding");
            resolved.push(ResolvedBinding { binding, template });
        }
    }

    Ok(resolved)
}
