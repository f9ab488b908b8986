//! Embedding generation service with preprocessing and batch processing

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use tracing::info;

use super::client::EmbeddingClient;
use super::client::EmbeddingProvider;
use super::preprocess_text_for_embedding;
use super::Embedder;
use super::EmbeddingConfig;
use crate::errors::Result;

/// Service for generating embeddings from the configured provider
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config)?)
    }

    /// Create from custom config
    pub fn from_config(mut config: EmbeddingConfig) -> Result<Self> {
        config.batch_size = config.batch_size.max(1);
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        info!(
            "Embedding service ready: {:?} / {}",
            config.provider, config.model
        );

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the provider
    pub const fn provider(&self) -> EmbeddingProvider {
        self.config.provider
    }
}

#[async_trait]
impl Embedder for EmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let processed_text = preprocess_text_for_embedding(text)?;
        self.client.generate(&processed_text).await
    }

    /// Any failed chunk fails the whole batch; callers never see a partial result.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let processed = texts
            .iter()
            .map(|text| preprocess_text_for_embedding(text))
            .collect::<Result<Vec<String>>>()?;

        let mut embeddings = Vec::with_capacity(processed.len());
        for (chunk_idx, chunk) in processed.chunks(self.config.batch_size).enumerate() {
            debug!(
                "Embedding chunk {} ({} texts)",
                chunk_idx + 1,
                chunk.len()
            );
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            embeddings.extend(self.client.generate_batch(&refs).await?);
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn service(server: &MockServer, batch_size: usize) -> EmbeddingService {
        service_for(EmbeddingProvider::Gemini, server, batch_size)
    }

    fn service_for(
        provider: EmbeddingProvider,
        server: &MockServer,
        batch_size: usize,
    ) -> EmbeddingService {
        EmbeddingService::from_config(EmbeddingConfig {
            provider,
            model: "text-embedding-004".to_string(),
            endpoint: server.uri(),
            api_key: Some("k".to_string()),
            batch_size,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_batches_are_chunked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:batchEmbedContents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{"values": [1.0]}, {"values": [2.0]}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let texts: Vec<String> = (0..4).map(|i| format!("place {i}")).collect();
        let embeddings = service(&server, 2).embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 4);
    }

    #[tokio::test]
    async fn test_blank_text_fails_whole_batch_before_any_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let texts = vec!["우도".to_string(), "   ".to_string()];
        assert!(service(&server, 10).embed_batch(&texts).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_call() {
        let server = MockServer::start().await;
        let embeddings = service(&server, 10).embed_batch(&[]).await.unwrap();
        assert!(embeddings.is_empty());
    }

    #[tokio::test]
    async fn test_ollama_batch_through_embedder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [0.25, 0.75]})))
            .expect(3)
            .mount(&server)
            .await;

        let embedder: Arc<dyn Embedder> =
            Arc::new(service_for(EmbeddingProvider::Ollama, &server, 2));
        let texts: Vec<String> = ["성산일출봉", "우도", "협재해변"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();

        // Spawning requires the trait future to be Send
        let handle = tokio::spawn(async move { embedder.embed_batch(&texts).await });
        let embeddings = handle.await.unwrap().unwrap();
        assert_eq!(embeddings, vec![vec![0.25, 0.75]; 3]);
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/text-embedding-004:batchEmbedContents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{"values": [1.0]}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let texts = vec!["우도".to_string(), "비자림".to_string()];
        let embeddings = service(&server, 0).embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);
    }
}
