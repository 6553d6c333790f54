//! Output assembly - stitches fragments into one Go source file

use crate::generation::Fragment;

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// Code generated by mixgen. DO NOT EDIT.";

/// Assemble the unformatted source for `package`.
///
/// `imports` must already be deduplicated and sorted. The import block is
/// left out entirely when it would be empty.
pub fn assemble(package: &str, imports: &[String], fragments: &[Fragment]) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    out.push_str("package ");
    out.push_str(package);
    out.push('\n');

    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for path in imports {
            out.push('\t');
            out.push_str(&quote(path));
            out.push('\n');
        }
        out.push_str(")\n");
    }

    for fragment in fragments {
        let text = fragment.text.trim_end();
        if text.trim().is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(text);
        out.push('\n');
    }

    out
}

fn quote(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len() + 2);
    quoted.push('"');
    for c in path.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
