use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSV file holding the place catalog
    pub path: String,
    /// Only the first `max_documents` records are indexed
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
}

fn default_max_documents() -> usize {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// `openai`, `ollama` or `gemini`
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

pub(crate) fn default_batch_size() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `openai`, `ollama` or `gemini`
    pub provider: String,
    pub endpoint: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "gemini-1.5-flash".to_string()
}

pub(crate) fn default_temperature() -> f32 {
    0.7
}

pub(crate) fn default_max_tokens() -> usize {
    1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "kr".to_string()
}

pub(crate) fn default_cache_ttl_secs() -> u64 {
    600
}

pub(crate) fn default_max_concurrent_lookups() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,
}

pub(crate) fn default_top_k() -> usize {
    5
}

fn default_max_context_length() -> usize {
    8000
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_context_length: default_max_context_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    pub weather: WeatherConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::JejuRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.rag.top_k == 0 {
            return Err(crate::JejuRagError::ConfigError(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        if self.embeddings.batch_size == 0 {
            return Err(crate::JejuRagError::ConfigError(
                "embeddings.batch_size must be at least 1".to_string(),
            ));
        }
        if self.rag.max_context_length == 0 {
            return Err(crate::JejuRagError::ConfigError(
                "rag.max_context_length must be at least 1".to_string(),
            ));
        }
        if self.weather.max_concurrent_lookups == 0 {
            return Err(crate::JejuRagError::ConfigError(
                "weather.max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get embedding API key, falling back to the provider's environment variable
    pub fn embedding_api_key(&self) -> Option<String> {
        resolve_key(&self.embeddings.api_key, &self.embeddings.provider)
    }

    /// Get LLM API key, falling back to the provider's environment variable
    pub fn llm_api_key(&self) -> Option<String> {
        resolve_key(&self.llm.api_key, &self.llm.provider)
    }

    /// Get weather API key, falling back to `OPENWEATHER_API_KEY`
    pub fn weather_api_key(&self) -> Option<String> {
        non_empty(&self.weather.api_key).or_else(|| env_key("OPENWEATHER_API_KEY"))
    }

    /// Get weather cache TTL; values past the representable range never expire
    pub fn weather_cache_ttl(&self) -> chrono::Duration {
        i64::try_from(self.weather.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Get catalog path
    pub fn catalog_path(&self) -> &str {
        &self.catalog.path
    }

    /// Get number of documents to retrieve per question
    pub fn top_k(&self) -> usize {
        self.rag.top_k
    }

    /// Copy of this configuration with secrets replaced, for display
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        for key in [
            &mut masked.embeddings.api_key,
            &mut masked.llm.api_key,
            &mut masked.weather.api_key,
        ] {
            if !key.is_empty() {
                *key = "********".to_string();
            }
        }
        masked
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| non_empty(&v))
}

fn resolve_key(configured: &str, provider: &str) -> Option<String> {
    non_empty(configured).or_else(|| match provider {
        "gemini" => env_key("GOOGLE_API_KEY"),
        "openai" => env_key("OPENAI_API_KEY"),
        _ => None,
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            catalog: CatalogConfig {
                path: "data/jeju-places.csv".to_string(),
                max_documents: default_max_documents(),
            },
            embeddings: EmbeddingsConfig {
                provider: "gemini".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "text-embedding-004".to_string(),
                api_key: String::new(),
                batch_size: default_batch_size(),
            },
            llm: LlmConfig {
                provider: "gemini".to_string(),
                endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: default_llm_model(),
                api_key: String::new(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            weather: WeatherConfig {
                endpoint: "https://api.openweathermap.org".to_string(),
                api_key: String::new(),
                units: default_units(),
                lang: default_lang(),
                cache_ttl_secs: default_cache_ttl_secs(),
                max_concurrent_lookups: default_max_concurrent_lookups(),
                timeout_secs: default_timeout_secs(),
            },
            rag: RagConfig::default(),
            server: ServerConfig::default(),
        }
    }
}
