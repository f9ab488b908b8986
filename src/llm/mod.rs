//! Language model access
//!
//! The pipeline only needs single-turn text completion, expressed by the
//! [`Generator`] trait. [`LlmService`] implements it over HTTP.

pub mod client;
pub mod prompts;

use async_trait::async_trait;

pub use client::LlmProvider;
pub use client::LlmService;
pub use prompts::PromptTemplate;
pub use prompts::TravelPrompts;

use crate::errors::Result;

/// Prompt → answer collaborator
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
