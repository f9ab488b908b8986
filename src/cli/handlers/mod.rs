//! CLI command handlers, organized by area:
//! - init: index building
//! - rag: search and questions
//! - weather: current weather
//! - serve: API server
//! - info: configuration display

pub mod info;
pub mod init;
pub mod rag;
pub mod serve;
pub mod weather;

pub use info::*;
pub use init::*;
pub use rag::*;
pub use serve::*;
pub use weather::*;
