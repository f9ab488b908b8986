//! Embedding API clients for various providers

use futures::stream::StreamExt;
use futures::stream::{self};
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::errors::JejuRagError;
use crate::errors::Result;

/// Ollama has no batch endpoint; this bounds the concurrent single requests
const OLLAMA_CONCURRENCY: usize = 16;

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    /// `OpenAI` embeddings API
    OpenAI,
    /// Ollama local embeddings
    Ollama,
    /// Google Gemini `embedContent` API
    Gemini,
}

/// Client for generating embeddings from various providers
pub struct EmbeddingClient {
    provider: EmbeddingProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiEmbedRequest<'a> {
    model: String,
    content: GeminiContent<'a>,
}

impl<'a> GeminiEmbedRequest<'a> {
    fn new(model: &str, text: &'a str) -> Self {
        Self {
            model: format!("models/{model}"),
            content: GeminiContent {
                parts: [GeminiPart { text }],
            },
        }
    }
}

#[derive(Deserialize)]
struct GeminiValues {
    values: Vec<f32>,
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// # Errors
    /// - HTTP client build errors (invalid configuration)
    pub fn new(
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_idle_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| JejuRagError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub const fn provider(&self) -> EmbeddingProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate embedding for a single text
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication failures)
    /// - Invalid API responses (malformed JSON, missing embedding)
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        match self.provider {
            EmbeddingProvider::OpenAI => self.generate_openai(text).await,
            EmbeddingProvider::Ollama => self.generate_ollama(text).await,
            EmbeddingProvider::Gemini => self.generate_gemini(text).await,
        }
    }

    /// Generate embeddings for multiple texts in batch
    ///
    /// The result has exactly one vector per input text, in input order.
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = match self.provider {
            EmbeddingProvider::OpenAI => self.generate_batch_openai(texts).await?,
            EmbeddingProvider::Gemini => self.generate_batch_gemini(texts).await?,
            EmbeddingProvider::Ollama => {
                let concurrency = texts.len().min(OLLAMA_CONCURRENCY);
                // Owned inputs; borrowed `&&str` futures are not Send behind async_trait
                let owned: Vec<String> = texts.iter().map(|text| (*text).to_string()).collect();
                let results: Vec<Result<Vec<f32>>> = stream::iter(owned)
                    .map(|text| async move { self.generate_ollama(&text).await })
                    .buffered(concurrency)
                    .collect()
                    .await;

                results.into_iter().collect::<Result<Vec<_>>>()?
            }
        };

        if embeddings.len() != texts.len() {
            return Err(JejuRagError::EmbeddingService(format!(
                "Provider returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }

    fn require_api_key(&self, provider: &str) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| JejuRagError::ConfigError(format!("{provider} API key not provided")))
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        request: reqwest::RequestBuilder,
        body: &T,
        provider: &str,
    ) -> Result<reqwest::Response> {
        let response = request
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| JejuRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(JejuRagError::EmbeddingService(format!(
                "{provider} API error ({status}): {error_text}"
            )));
        }

        Ok(response)
    }

    /// Generate embedding using `OpenAI` API
    async fn generate_openai(&self, text: &str) -> Result<Vec<f32>> {
        let mut batch = self.generate_batch_openai(&[text]).await?;
        batch
            .pop()
            .ok_or_else(|| JejuRagError::EmbeddingService("No embedding in response".to_string()))
    }

    /// Generate embeddings in batch using `OpenAI` API
    async fn generate_batch_openai(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.require_api_key("OpenAI")?;

        #[derive(Serialize)]
        struct OpenAIBatchRequest<'a> {
            input: &'a [&'a str],
            model: &'a str,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            data: Vec<EmbeddingData>,
        }

        #[derive(Deserialize)]
        struct EmbeddingData {
            #[serde(default)]
            index: usize,
            embedding: Vec<f32>,
        }

        let url = format!("{}/embeddings", self.endpoint);
        debug!("Calling OpenAI embeddings API: {} items", texts.len());

        let request = OpenAIBatchRequest {
            input: texts,
            model: &self.model,
        };

        let response = self
            .send_json(
                self.client
                    .post(&url)
                    .header("Authorization", format!("Bearer {api_key}")),
                &request,
                "OpenAI",
            )
            .await?;

        let mut result: OpenAIResponse = response.json().await.map_err(|e| {
            JejuRagError::EmbeddingService(format!("Failed to parse response: {e}"))
        })?;

        // The API documents `index`; don't rely on response order
        result.data.sort_by_key(|d| d.index);
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Generate embedding using Gemini `embedContent`
    async fn generate_gemini(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self.require_api_key("Gemini")?;

        #[derive(Deserialize)]
        struct GeminiResponse {
            embedding: GeminiValues,
        }

        let url = format!("{}/models/{}:embedContent", self.endpoint, self.model);
        debug!("Calling Gemini embeddings API: {}", url);

        let response = self
            .send_json(
                self.client.post(&url).header("x-goog-api-key", api_key),
                &GeminiEmbedRequest::new(&self.model, text),
                "Gemini",
            )
            .await?;

        let result: GeminiResponse = response.json().await.map_err(|e| {
            JejuRagError::EmbeddingService(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.embedding.values)
    }

    /// Generate embeddings using Gemini `batchEmbedContents`
    async fn generate_batch_gemini(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let api_key = self.require_api_key("Gemini")?;

        #[derive(Serialize)]
        struct GeminiBatchRequest<'a> {
            requests: Vec<GeminiEmbedRequest<'a>>,
        }

        #[derive(Deserialize)]
        struct GeminiBatchResponse {
            #[serde(default)]
            embeddings: Vec<GeminiValues>,
        }

        let url = format!("{}/models/{}:batchEmbedContents", self.endpoint, self.model);
        debug!("Calling Gemini batch embeddings API: {} items", texts.len());

        let request = GeminiBatchRequest {
            requests: texts
                .iter()
                .map(|&text| GeminiEmbedRequest::new(&self.model, text))
                .collect(),
        };

        let response = self
            .send_json(
                self.client.post(&url).header("x-goog-api-key", api_key),
                &request,
                "Gemini",
            )
            .await?;

        let result: GeminiBatchResponse = response.json().await.map_err(|e| {
            JejuRagError::EmbeddingService(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.embeddings.into_iter().map(|e| e.values).collect())
    }

    /// Generate embedding using Ollama API
    async fn generate_ollama(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            embedding: Vec<f32>,
        }

        let url = format!("{}/api/embeddings", self.endpoint);
        debug!("Calling Ollama embeddings API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .send_json(self.client.post(&url), &request, "Ollama")
            .await?;

        let result: OllamaResponse = response.json().await.map_err(|e| {
            JejuRagError::EmbeddingService(format!("Failed to parse response: {e}"))
        })?;

        Ok(result.embedding)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;

    use super::*;

    fn client(provider: EmbeddingProvider, server: &MockServer) -> EmbeddingClient {
        EmbeddingClient::new(
            provider,
            "test-model".to_string(),
            server.uri(),
            Some("test-key".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_gemini_single_embedding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:embedContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"embedding": {"values": [0.1, 0.2, 0.3]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let embedding = client(EmbeddingProvider::Gemini, &server)
            .generate("성산일출봉")
            .await
            .unwrap();
        assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_gemini_batch_embedding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test-model:batchEmbedContents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [{"values": [1.0, 0.0]}, {"values": [0.0, 1.0]}]
            })))
            .mount(&server)
            .await;

        let embeddings = client(EmbeddingProvider::Gemini, &server)
            .generate_batch(&["a", "b"])
            .await
            .unwrap();
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_openai_batch_is_reordered_by_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 1, "embedding": [2.0]},
                    {"index": 0, "embedding": [1.0]}
                ]
            })))
            .mount(&server)
            .await;

        let embeddings = client(EmbeddingProvider::OpenAI, &server)
            .generate_batch(&["first", "second"])
            .await
            .unwrap();
        assert_eq!(embeddings, vec![vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn test_ollama_batch_fans_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [0.5]})))
            .expect(3)
            .mount(&server)
            .await;

        let embeddings = client(EmbeddingProvider::Ollama, &server)
            .generate_batch(&["a", "b", "c"])
            .await
            .unwrap();
        assert_eq!(embeddings.len(), 3);
    }

    #[tokio::test]
    async fn test_http_error_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = client(EmbeddingProvider::Gemini, &server)
            .generate("x")
            .await
            .unwrap_err();
        match err {
            JejuRagError::EmbeddingService(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_short_batch_response_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"embeddings": [{"values": [1.0]}]})),
            )
            .mount(&server)
            .await;

        let err = client(EmbeddingProvider::Gemini, &server)
            .generate_batch(&["a", "b"])
            .await
            .unwrap_err();
        assert!(matches!(err, JejuRagError::EmbeddingService(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::OpenAI,
            "m".to_string(),
            "http://localhost:1".to_string(),
            None,
        )
        .unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, JejuRagError::ConfigError(_)));
    }
}
