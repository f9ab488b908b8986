//! Embeddings generation module
//!
//! This module provides functionality for generating text embeddings using various providers:
//! - Gemini (text-embedding-004)
//! - OpenAI (text-embedding-3-small, etc.)
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use jejurag::config::AppConfig;
//! use jejurag::embeddings::Embedder;
//! use jejurag::embeddings::EmbeddingService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.embed("바다가 보이는 카페").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;
pub mod text_preprocessing;

use std::str::FromStr;

use async_trait::async_trait;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::JejuRagError;
use crate::errors::Result;

/// Text → vector collaborator.
///
/// The same implementation must be used to build an index and to query it,
/// otherwise the vectors live in different spaces.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts; the output has one vector per input, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub batch_size: usize,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        Ok(Self {
            provider: EmbeddingProvider::from_str(&config.embeddings.provider)?,
            model: config.embeddings.model.clone(),
            endpoint: config.embeddings.endpoint.trim_end_matches('/').to_string(),
            api_key: config.embedding_api_key(),
            batch_size: config.embeddings.batch_size.max(1),
        })
    }
}

impl FromStr for EmbeddingProvider {
    type Err = JejuRagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(JejuRagError::ConfigError(format!(
                "Unknown embedding provider: {other}"
            ))),
        }
    }
}
