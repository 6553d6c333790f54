//! Core types for the generation domain

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a scanned type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Struct,
    Interface,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Struct => "struct",
            DeclarationKind::Interface => "interface",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A struct field or interface method of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub type_name: String,
    pub tag: Option<String>,
    /// Declared without an explicit name
    pub embedded: bool,
}

/// A struct or interface type declared at package level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub package: String,
    pub kind: DeclarationKind,
    pub members: Vec<Member>,
    /// Type names of embedded members, in declaration order
    pub embedded: Vec<String>,
    pub file: PathBuf,
    /// 1-based line of the type name
    pub line: usize,
}

impl Declaration {
    /// Directory the declaring file lives in
    pub fn directory(&self) -> &Path {
        self.file.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Embedded type names with duplicates removed, first occurrence wins
    pub fn distinct_embedded(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.embedded.len());
        for name in &self.embedded {
            if !seen.contains(&name.as_str()) {
                seen.push(name.as_str());
            }
        }
        seen
    }
}

/// Result of scanning one package directory
#[derive(Debug, Clone, Default)]
pub struct ScannedPackage {
    pub directory: PathBuf,
    /// `None` when the directory holds no scannable source files
    pub name: Option<String>,
    /// Declarations in file order, then declaration order within each file
    pub declarations: Vec<Declaration>,
    pub files: Vec<PathBuf>,
}

/// Pairing of a declaration with a template it opted into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinding<'a> {
    pub declaration: &'a Declaration,
    pub template: String,
}

impl fmt::Display for TemplateBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.declaration.name, self.template)
    }
}

/// Rendered output of one binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub declaration: String,
    pub template: String,
    pub text: String,
}

/// Assembled, formatted output for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub package: String,
    pub imports: Vec<String>,
    pub fragments: usize,
    pub content: String,
}

/// What happened to one package directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// A generated file was written
    Written {
        path: PathBuf,
        fragments: usize,
        imports: usize,
    },
    /// No declaration bound to a template; nothing was written
    NoBindings {
        /// A stale generated file from an earlier run was removed
        removed_stale: bool,
    },
}
