//! Generation domain module - orchestrates code generation workflow
//!
//! This module implements the core generation logic: scanned declarations
//! are paired with the templates they embed, each pair is rendered with its
//! own context, and the fragments are assembled into one formatted Go file
//! per package directory.

pub mod assembler;
pub mod bindings;
pub mod context;
pub mod errors;
pub mod imports;
pub mod orchestrator;
pub mod traits;
pub mod types;
pub mod utils;

pub use assembler::*;
pub use bindings::*;
pub use context::*;
pub use errors::*;
pub use imports::*;
pub use orchestrator::*;
pub use traits::*;
pub use types::*;
