//! Go source parser built on tree-sitter
//!
//! Turns the text of one `.go` file into its package name and the struct and
//! interface types it declares at package level. tree-sitter recovers from
//! syntax errors, so the tree is checked for error and missing nodes and the
//! first one found is reported as a positioned [`GenerationError::SourceParse`].

use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::generation::utils::unquote_literal;
use crate::generation::{Declaration, DeclarationKind, GenerationError, Member};

/// Package name and declarations of one parsed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub package: String,
    pub declarations: Vec<Declaration>,
}

/// Reusable Go parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, GenerationError> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| GenerationError::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse `source` and fail on the first syntax error
    pub fn parse_tree(&mut self, file: &Path, source: &str) -> Result<Tree, GenerationError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            GenerationError::Parser(format!("tree-sitter gave up on {}", file.display()))
        })?;

        if let Some(node) = first_syntax_error(tree.root_node()) {
            let position = node.start_position();
            return Err(GenerationError::SourceParse {
                file: file.to_path_buf(),
                line: position.row + 1,
                column: position.column + 1,
                message: describe_error(node, source),
            });
        }

        Ok(tree)
    }

    /// Parse a file into its package name and package-level declarations
    pub fn parse_file(&mut self, file: &Path, source: &str) -> Result<ParsedFile, GenerationError> {
        let tree = self.parse_tree(file, source)?;
        let root = tree.root_node();
        let bytes = source.as_bytes();

        let package = package_name(root, bytes).ok_or_else(|| GenerationError::SourceParse {
            file: file.to_path_buf(),
            line: 1,
            column: 1,
            message: "expected package clause".to_string(),
        })?;

        let mut declarations = Vec::new();
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if child.kind() != "type_declaration" {
                continue;
            }
            let mut spec_cursor = child.walk();
            for spec in child.named_children(&mut spec_cursor) {
                // Aliases (`type A = B`) are a different node kind and never bind
                if spec.kind() != "type_spec" {
                    continue;
                }
                if let Some(declaration) = extract_type_spec(spec, bytes, file, &package) {
                    declarations.push(declaration);
                }
            }
        }

        Ok(ParsedFile {
            package,
            declarations,
        })
    }
}

fn text<'a>(node: Node<'_>, bytes: &'a [u8]) -> &'a str {
    node.utf8_text(bytes).unwrap_or_default()
}

fn first_syntax_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_syntax_error)
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    if node.is_missing() {
        return format!("missing {}", node.kind());
    }
    let snippet: String = text(node, source.as_bytes())
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(32)
        .collect();
    if snippet.trim().is_empty() {
        "unexpected input".to_string()
    } else {
        format!("unexpected `{}`", snippet.trim())
    }
}

fn package_name(root: Node<'_>, bytes: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    let clause = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == "package_clause")?;
    let name = clause.named_child(0)?;
    Some(text(name, bytes).to_string())
}

fn extract_type_spec(
    spec: Node<'_>,
    bytes: &[u8],
    file: &Path,
    package: &str,
) -> Option<Declaration> {
    let name_node = spec.child_by_field_name("name")?;
    let type_node = spec.child_by_field_name("type")?;

    let (kind, members) = match type_node.kind() {
        "struct_type" => (DeclarationKind::Struct, struct_members(type_node, bytes)),
        "interface_type" => (DeclarationKind::Interface, interface_members(type_node, bytes)),
        _ => return None,
    };

    let embedded = members
        .iter()
        .filter(|member| member.embedded)
        .filter_map(|member| embedded_name_of(&member.type_name))
        .collect();

    Some(Declaration {
        name: text(name_node, bytes).to_string(),
        package: package.to_string(),
        kind,
        members,
        embedded,
        file: file.to_path_buf(),
        line: name_node.start_position().row + 1,
    })
}

fn struct_members(struct_type: Node<'_>, bytes: &[u8]) -> Vec<Member> {
    let mut members = Vec::new();
    let mut cursor = struct_type.walk();
    let Some(list) = struct_type
        .named_children(&mut cursor)
        .find(|child| child.kind() == "field_declaration_list")
    else {
        return members;
    };

    let mut list_cursor = list.walk();
    for field in list.named_children(&mut list_cursor) {
        if field.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = field.child_by_field_name("type") else {
            continue;
        };
        let tag = field
            .child_by_field_name("tag")
            .map(|tag| unquote_literal(text(tag, bytes)));

        let mut name_cursor = field.walk();
        let names: Vec<Node<'_>> = field
            .children_by_field_name("name", &mut name_cursor)
            .collect();

        if names.is_empty() {
            let mut token_cursor = field.walk();
            let pointer = field
                .children(&mut token_cursor)
                .any(|child| child.kind() == "*");
            let written = text(type_node, bytes);
            let type_name = if pointer {
                format!("*{written}")
            } else {
                written.to_string()
            };
            let Some(base) = embedded_name_of(&type_name) else {
                continue;
            };
            members.push(Member {
                name: field_name_of(&base),
                type_name,
                tag,
                embedded: true,
            });
        } else {
            for name in names {
                members.push(Member {
                    name: text(name, bytes).to_string(),
                    type_name: text(type_node, bytes).to_string(),
                    tag: tag.clone(),
                    embedded: false,
                });
            }
        }
    }

    members
}

fn interface_members(interface_type: Node<'_>, bytes: &[u8]) -> Vec<Member> {
    let mut members = Vec::new();
    let mut cursor = interface_type.walk();
    for element in interface_type.named_children(&mut cursor) {
        match element.kind() {
            "method_elem" | "method_spec" => {
                let Some(name) = element.child_by_field_name("name") else {
                    continue;
                };
                let parameters = element
                    .child_by_field_name("parameters")
                    .map(|p| text(p, bytes))
                    .unwrap_or("()");
                let signature = match element.child_by_field_name("result") {
                    Some(result) => format!("func{parameters} {}", text(result, bytes)),
                    None => format!("func{parameters}"),
                };
                members.push(Member {
                    name: text(name, bytes).to_string(),
                    type_name: signature,
                    tag: None,
                    embedded: false,
                });
            }
            "type_elem" | "constraint_elem" | "interface_type_name" => {
                // Only a lone named type embeds; unions and `~T` are constraints
                let mut elem_cursor = element.walk();
                let parts: Vec<Node<'_>> = element.named_children(&mut elem_cursor).collect();
                let named = match parts.as_slice() {
                    [] if element.kind() == "interface_type_name" => Some(element),
                    [single] if is_named_type(*single) => Some(*single),
                    _ => None,
                };
                if let Some(named) = named {
                    let type_name = text(named, bytes).to_string();
                    if let Some(base) = embedded_name_of(&type_name) {
                        members.push(Member {
                            name: field_name_of(&base),
                            type_name,
                            tag: None,
                            embedded: true,
                        });
                    }
                }
            }
            _ => {}
        }
    }
    members
}

fn is_named_type(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "type_identifier" | "qualified_type" | "generic_type"
    )
}

/// Binding name of an embedded type as written: pointer and type
/// arguments removed, package qualifier kept.
pub fn embedded_name_of(written: &str) -> Option<String> {
    let name = written.trim().trim_start_matches('*').trim();
    let name = match name.find('[') {
        Some(index) => &name[..index],
        None => name,
    };
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Go's implicit field name for an embedded type: the unqualified type name
fn field_name_of(embedded: &str) -> String {
    embedded
        .rsplit('.')
        .next()
        .unwrap_or(embedded)
        .to_string()
}
