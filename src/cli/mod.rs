//! CLI module for the `jejurag` binary
//!
//! - Command line argument parsing
//! - Command handlers, one file per area under handlers/
//! - Output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::*;
pub use handlers::*;
pub use output::*;
