//! Helpers for interpreting Go source conventions
//!
//! These utilities belong in the generation domain as they shape the data
//! templates see.

use std::collections::BTreeMap;

/// Parses a Go struct tag into its key/value pairs.
///
/// Follows the conventional `key:"value" key2:"value2"` layout used by
/// `reflect.StructTag`. Parsing stops at the first malformed pair, keeping
/// everything read before it. A key that appears twice keeps its first value.
///
/// # Examples
/// ```
/// use mixgen::generation::utils::parse_struct_tag;
///
/// let tags = parse_struct_tag(r#"json:"id,omitempty" db:"user_id""#);
/// assert_eq!(tags["json"], "id,omitempty");
/// assert_eq!(tags["db"], "user_id");
/// ```
pub fn parse_struct_tag(tag: &str) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        let key_len = rest
            .char_indices()
            .find(|&(_, c)| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if key_len == 0 || !rest[key_len..].starts_with(":\"") {
            break;
        }
        let key = &rest[..key_len];
        rest = &rest[key_len + 2..];

        let Some((value, remaining)) = split_quoted(rest) else {
            break;
        };
        pairs.entry(key.to_string()).or_insert(value);
        rest = remaining;
    }

    pairs
}

/// Reads a double-quoted value whose opening quote was already consumed,
/// returning the unescaped value and the input after the closing quote.
fn split_quoted(input: &str) -> Option<(String, &str)> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, &input[i + 1..])),
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    other => value.push(other),
                }
            }
            other => value.push(other),
        }
    }
    None
}

/// Strips the quotes from a Go string literal as written in source.
///
/// Raw literals (backquoted) are returned verbatim; interpreted literals have
/// their simple escapes resolved.
pub fn unquote_literal(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
    {
        return raw.to_string();
    }
    if let Some((value, _)) = literal.strip_prefix('"').and_then(split_quoted) {
        return value;
    }
    literal.to_string()
}
