//! RAG (Retrieval-Augmented Generation) module
//!
//! Answers a travel question in four steps:
//! - semantic retrieval of the top places
//! - per-place weather enrichment
//! - context assembly
//! - grounded answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use jejurag::config::AppConfig;
//! use jejurag::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config)?;
//!
//!     let response = service.answer("비 오는 날 갈 만한 카페").await?;
//!     println!("{}", response.format());
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;

pub use context::ContextAssembler;
pub use pipeline::PlaceWithWeather;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use pipeline::WeatherSummary;
