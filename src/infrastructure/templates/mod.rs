//! Template loading: the file-backed catalog and its helper filters

pub mod catalog;
pub mod errors;
pub mod filters;

pub use catalog::*;
pub use errors::*;
