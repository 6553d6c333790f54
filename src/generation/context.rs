//! Template context - the per-binding view handed to a template
//!
//! A [`TemplateContext`] is built fresh for every binding and never shared.
//! Templates see its fields under Go-flavoured capitalised names:
//!
//! | Variable   | Content                                               |
//! |------------|-------------------------------------------------------|
//! | `Name`     | declaring type name                                   |
//! | `Package`  | package name                                          |
//! | `Kind`     | `struct` or `interface`                               |
//! | `Template` | name of the template being rendered                   |
//! | `Fields`   | members, each with `Name`, `Type`, `Tag`, `Tags`, `Embedded` |
//! | `Embeds`   | distinct embedded type names                          |
//! | `Decl`     | the raw scanned declaration                           |
//!
//! The `AddImport(path="...")` function is bound to the context's
//! [`ImportRecorder`] by the renderer for the duration of one render.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::generation::utils::parse_struct_tag;
use crate::generation::{Declaration, ImportRecorder, Member, TemplateBinding};

/// A member as templates see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldContext {
    pub name: String,
    #[serde(rename = "Type")]
    pub type_name: String,
    /// Tag contents, empty when the member has none
    pub tag: String,
    /// The tag parsed as `key:"value"` pairs
    pub tags: BTreeMap<String, String>,
    pub embedded: bool,
}

impl From<&Member> for FieldContext {
    fn from(member: &Member) -> Self {
        let tag = member.tag.clone().unwrap_or_default();
        Self {
            name: member.name.clone(),
            type_name: member.type_name.clone(),
            tags: parse_struct_tag(&tag),
            tag,
            embedded: member.embedded,
        }
    }
}

/// Context for rendering a single binding
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateContext<'a> {
    pub name: &'a str,
    pub package: &'a str,
    pub kind: &'static str,
    pub template: &'a str,
    pub fields: Vec<FieldContext>,
    pub embeds: Vec<&'a str>,
    pub decl: &'a Declaration,
    #[serde(skip)]
    imports: ImportRecorder,
}

impl<'a> TemplateContext<'a> {
    /// Build a fresh context for `binding`
    pub fn for_binding(binding: &'a TemplateBinding<'a>) -> Self {
        let declaration = binding.declaration;
        Self {
            name: &declaration.name,
            package: &declaration.package,
            kind: declaration.kind.as_str(),
            template: &binding.template,
            fields: declaration.members.iter().map(FieldContext::from).collect(),
            embeds: declaration.distinct_embedded(),
            decl: declaration,
            imports: ImportRecorder::new(),
        }
    }

    /// Recorder behind this context's `AddImport`
    pub fn imports(&self) -> &ImportRecorder {
        &self.imports
    }

    /// Equivalent of calling `AddImport` from the template
    pub fn add_import(&self, path: impl Into<String>) {
        self.imports.add(path);
    }
}
