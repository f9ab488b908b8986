//! Text generation clients for the supported providers

use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::Generator;
use crate::config::AppConfig;
use crate::errors::JejuRagError;
use crate::errors::Result;

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI-compatible `/chat/completions`
    OpenAI,
    /// Ollama `/api/generate`
    Ollama,
    /// Google Gemini `generateContent`
    Gemini,
}

impl FromStr for LlmProvider {
    type Err = JejuRagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(JejuRagError::ConfigError(format!(
                "Unknown LLM provider: {other}"
            ))),
        }
    }
}

/// Single-turn completion client
pub struct LlmService {
    provider: LlmProvider,
    model: String,
    endpoint: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: usize,
    client: Client,
}

impl LlmService {
    /// Create from `[llm]` settings
    pub fn new(config: &AppConfig) -> Result<Self> {
        let service = Self::with_settings(
            LlmProvider::from_str(&config.llm.provider)?,
            config.llm.model.clone(),
            &config.llm.endpoint,
            config.llm_api_key(),
        )?
        .with_params(config.llm.temperature, config.llm.max_tokens);

        info!(
            "LLM service ready: {:?} / {}",
            service.provider, service.model
        );
        Ok(service)
    }

    pub fn with_settings(
        provider: LlmProvider,
        model: String,
        endpoint: &str,
        api_key: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| JejuRagError::HttpError(e.to_string()))?;

        Ok(Self {
            provider,
            model,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            temperature: crate::config::default_temperature(),
            max_tokens: crate::config::default_max_tokens(),
            client,
        })
    }

    /// Default sampling parameters for [`Generator::generate`]
    #[must_use]
    pub fn with_params(mut self, temperature: f32, max_tokens: usize) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub const fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate with explicit sampling parameters
    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        debug!(
            "Generating with {:?}: {} prompt chars",
            self.provider,
            prompt.chars().count()
        );

        let text = match self.provider {
            LlmProvider::OpenAI => self.generate_openai(prompt, temperature, max_tokens).await?,
            LlmProvider::Ollama => self.generate_ollama(prompt, temperature, max_tokens).await?,
            LlmProvider::Gemini => self.generate_gemini(prompt, temperature, max_tokens).await?,
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(JejuRagError::Generation(
                "model returned an empty answer".to_string(),
            ));
        }
        Ok(text)
    }

    fn require_api_key(&self, provider: &str) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| JejuRagError::ConfigError(format!("{provider} API key not provided")))
    }

    async fn post_json<T: Serialize + Sync, R: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        body: &T,
        provider: &str,
    ) -> Result<R> {
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| JejuRagError::Generation(format!("{provider} request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(JejuRagError::Generation(format!(
                "{provider} API error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| JejuRagError::Generation(format!("Failed to parse {provider} response: {e}")))
    }

    async fn generate_openai(&self, prompt: &str, temperature: f32, max_tokens: usize) -> Result<String> {
        let api_key = self.require_api_key("OpenAI")?;

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: [ChatMessage<'a>; 1],
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: AssistantMessage,
        }

        #[derive(Deserialize)]
        struct AssistantMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.endpoint);
        let response: ChatResponse = self
            .post_json(
                self.client
                    .post(&url)
                    .header("Authorization", format!("Bearer {api_key}")),
                &request,
                "OpenAI",
            )
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| JejuRagError::Generation("No choices in response".to_string()))
    }

    async fn generate_ollama(&self, prompt: &str, temperature: f32, max_tokens: usize) -> Result<String> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: Options,
        }

        #[derive(Serialize)]
        struct Options {
            temperature: f32,
            num_predict: usize,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            response: String,
        }

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: Options {
                temperature,
                num_predict: max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.endpoint);
        let response: GenerateResponse = self
            .post_json(self.client.post(&url), &request, "Ollama")
            .await?;
        Ok(response.response)
    }

    async fn generate_gemini(&self, prompt: &str, temperature: f32, max_tokens: usize) -> Result<String> {
        let api_key = self.require_api_key("Gemini")?;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerateContentRequest<'a> {
            contents: [Content<'a>; 1],
            generation_config: GenerationConfig,
        }

        #[derive(Serialize)]
        struct Content<'a> {
            role: &'a str,
            parts: [Part<'a>; 1],
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GenerationConfig {
            temperature: f32,
            max_output_tokens: usize,
        }

        #[derive(Deserialize)]
        struct GenerateContentResponse {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<CandidatePart>,
        }

        #[derive(Deserialize)]
        struct CandidatePart {
            #[serde(default)]
            text: String,
        }

        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let response: GenerateContentResponse = self
            .post_json(
                self.client.post(&url).header("x-goog-api-key", api_key),
                &request,
                "Gemini",
            )
            .await?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| JejuRagError::Generation("No candidates in response".to_string()))?;

        Ok(candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect::<String>())
    }
}

#[async_trait]
impl Generator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, self.temperature, self.max_tokens)
            .await
    }
}
