use thiserror::Error;

#[derive(Error, Debug)]
pub enum JejuRagError {
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Index build failed: {0}")]
    IndexBuild(String),

    #[error("Weather fetch failed: {0}")]
    WeatherFetch(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JejuRagError {
    /// True when the failure came from an external collaborator (embedding,
    /// weather or generation service) rather than from bad local input.
    #[must_use]
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingService(_)
                | Self::IndexBuild(_)
                | Self::WeatherFetch(_)
                | Self::Generation(_)
                | Self::HttpError(_)
        )
    }

    /// True for errors caused by caller-supplied input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidCoordinate { .. } | Self::InvalidQuery(_))
    }
}

pub type Result<T> = std::result::Result<T, JejuRagError>;
