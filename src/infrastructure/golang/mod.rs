//! Go source support: tree-sitter parsing and package directory scanning

pub mod parser;
pub mod scanner;

pub use parser::{GoParser, ParsedFile};
pub use scanner::PackageScanner;
