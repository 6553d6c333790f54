//! Tera-based template renderer implementation

use std::collections::HashMap;

use tera::{Context, Value};

use crate::generation::{
    Fragment, GenerationError, ImportRecorder, TemplateContext, error_chain,
};
use crate::infrastructure::templates::Template;

/// Name templates call to request an import
pub const ADD_IMPORT: &str = "AddImport";

impl tera::Function for ImportRecorder {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| {
                tera::Error::msg(format!(
                    "{ADD_IMPORT} requires a non-empty string `path` argument"
                ))
            })?;
        self.add(path);
        Ok(Value::String(String::new()))
    }
}

/// Tera-based template renderer
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `template` for one binding.
    ///
    /// The parsed template is cloned so `AddImport` can be bound to this
    /// context's recorder without touching the cached copy.
    pub fn render(
        &self,
        template: &Template,
        context: &TemplateContext<'_>,
    ) -> Result<Fragment, GenerationError> {
        let execution_error = |diagnostic: String| GenerationError::TemplateExecution {
            declaration: context.name.to_string(),
            template: template.name().to_string(),
            diagnostic,
        };

        let tera_context =
            Context::from_serialize(context).map_err(|e| execution_error(error_chain(&e)))?;

        let mut engine = template.engine().clone();
        engine.register_function(ADD_IMPORT, context.imports().clone());

        let text = engine
            .render(template.name(), &tera_context)
            .map_err(|e| execution_error(error_chain(&e)))?;

        tracing::debug!(
            declaration = %context.name,
            template = %template.name(),
            bytes = text.len(),
            "Rendered fragment"
        );

        Ok(Fragment {
            declaration: context.name.to_string(),
            template: template.name().to_string(),
            text,
        })
    }
}

impl Default for TeraTemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{Declaration, DeclarationKind, Member, TemplateBinding};
    use std::path::{Path, PathBuf};

    fn declaration() -> Declaration {
        Declaration {
            name: "Bar".to_string(),
            package: "demo".to_string(),
            kind: DeclarationKind::Struct,
            members: vec![
                Member {
                    name: "Foo".to_string(),
                    type_name: "Foo".to_string(),
                    tag: None,
                    embedded: true,
                },
                Member {
                    name: "Count".to_string(),
                    type_name: "int".to_string(),
                    tag: Some(r#"json:"count""#.to_string()),
                    embedded: false,
                },
            ],
            embedded: vec!["Foo".to_string()],
            file: PathBuf::from("demo/bar.go"),
            line: 3,
        }
    }

    fn render(body: &str) -> (Result<Fragment, GenerationError>, Vec<String>) {
        let decl = declaration();
        let binding = TemplateBinding {
            declaration: &decl,
            template: "Foo".to_string(),
        };
        let context = TemplateContext::for_binding(&binding);
        let template = Template::parse("Foo", Path::new("demo/Foo.tmpl"), body).unwrap();
        let result = TeraTemplateRenderer::new().render(&template, &context);
        (result, context.imports().paths())
    }

    #[test]
    fn test_render_name() {
        let (result, imports) = render("// for {{ Name }}");
        let fragment = result.unwrap();
        assert_eq!(fragment.text, "// for Bar");
        assert_eq!(fragment.declaration, "Bar");
        assert_eq!(fragment.template, "Foo");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_render_fields_loop() {
        let body = "{% for f in Fields %}{% if not f.Embedded %}{{ f.Name }}:{{ f.Type }}:{{ f.Tags.json }}{% endif %}{% endfor %}";
        let (result, _) = render(body);
        assert_eq!(result.unwrap().text, "Count:int:count");
    }

    #[test]
    fn test_add_import_records_and_renders_nothing() {
        let body = r#"{{ AddImport(path="net/http") }}{{ AddImport(path="fmt") }}{{ AddImport(path="net/http") }}x"#;
        let (result, imports) = render(body);
        assert_eq!(result.unwrap().text, "x");
        assert_eq!(imports, vec!["net/http", "fmt", "net/http"]);
    }

    #[test]
    fn test_add_import_requires_path() {
        let (result, _) = render(r#"{{ AddImport(alias="x") }}"#);
        match result {
            Err(GenerationError::TemplateExecution { diagnostic, .. }) => {
                assert!(diagnostic.contains("AddImport"));
            }
            other => panic!("Expected TemplateExecution, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_variable_is_execution_error() {
        let (result, _) = render("{{ Missing }}");
        match result {
            Err(GenerationError::TemplateExecution {
                declaration,
                template,
                diagnostic,
            }) => {
                assert_eq!(declaration, "Bar");
                assert_eq!(template, "Foo");
                assert!(diagnostic.contains("Missing"));
            }
            other => panic!("Expected TemplateExecution, got {:?}", other),
        }
    }

    #[test]
    fn test_render_does_not_mutate_cached_template() {
        let decl = declaration();
        let binding = TemplateBinding {
            declaration: &decl,
            template: "Foo".to_string(),
        };
        let template =
            Template::parse("Foo", Path::new("demo/Foo.tmpl"), r#"{{ AddImport(path="fmt") }}"#)
                .unwrap();
        let renderer = TeraTemplateRenderer::new();

        let first = TemplateContext::for_binding(&binding);
        let second = TemplateContext::for_binding(&binding);
        renderer.render(&template, &first).unwrap();
        renderer.render(&template, &second).unwrap();

        assert_eq!(first.imports().paths(), vec!["fmt"]);
        assert_eq!(second.imports().paths(), vec!["fmt"]);
    }
}
