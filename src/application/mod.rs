//! Application layer - orchestrates use cases and coordinates between domains

pub mod commands;
pub mod errors;
pub mod generate;

pub use commands::*;
pub use errors::*;
pub use generate::*;
