//! Process execution for external tools

pub mod command_executor;

pub use command_executor::*;
