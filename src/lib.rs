//! Weather-aware travel assistant over a Jeju place catalog.
//!
//! A question is answered by semantic retrieval over the catalog, live weather
//! for each retrieved place, and a grounded language-model answer.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod weather;


pub use config::AppConfig;
pub use errors::*;
