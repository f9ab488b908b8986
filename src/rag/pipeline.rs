//! Complete RAG pipeline: Retrieve -> Enrich -> Generate

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::ContextAssembler;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::config::RagConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::JejuRagError;
use crate::errors::Result;
use crate::index::IndexedDocument;
use crate::index::ScoredDocument;
use crate::index::SemanticIndex;
use crate::llm::Generator;
use crate::llm::LlmService;
use crate::llm::TravelPrompts;
use crate::weather::recommend;
use crate::weather::PlaceLocation;
use crate::weather::PlaceWeather;
use crate::weather::WeatherService;

/// Weather attached to an answered place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub temperature: i32,
    pub feels_like: i32,
    pub description: String,
    pub humidity: u32,
    pub wind_speed: f64,
    pub icon: String,
    pub recommendation: String,
}

impl From<&PlaceWeather> for WeatherSummary {
    fn from(place_weather: &PlaceWeather) -> Self {
        let weather = &place_weather.weather;
        Self {
            temperature: weather.temperature,
            feels_like: weather.feels_like,
            description: weather.description.clone(),
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
            icon: weather.icon.clone(),
            recommendation: recommend(weather).to_string(),
        }
    }
}

/// A retrieved place as handed to presentation layers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceWithWeather {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: Option<WeatherSummary>,
    pub region_label: Option<String>,
}

/// Answer plus the places it was grounded on
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub query: String,
    pub answer: String,
    #[serde(skip)]
    pub context: String,
    pub places: Vec<PlaceWithWeather>,
}

impl RagResponse {
    /// Terminal rendering
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Query: {}\n\n", self.query));
        output.push_str(&format!("Answer:\n{}\n\n", self.answer));
        output.push_str(&format!("Places ({}):\n", self.places.len()));

        for (idx, place) in self.places.iter().enumerate() {
            output.push_str(&format!("  {}. {}", idx + 1, place.name));
            if let Some(category) = &place.category {
                output.push_str(&format!(" [{category}]"));
            }
            output.push('\n');
            if !place.address.is_empty() {
                output.push_str(&format!("     {}\n", place.address));
            }
            match (&place.weather, &place.region_label) {
                (Some(weather), Some(region)) => output.push_str(&format!(
                    "     {region}: {}°C {} - {}\n",
                    weather.temperature, weather.description, weather.recommendation
                )),
                (Some(weather), None) => output.push_str(&format!(
                    "     {}°C {} - {}\n",
                    weather.temperature, weather.description, weather.recommendation
                )),
                _ => {}
            }
        }

        output
    }
}

/// Retrieval orchestrator
pub struct RagService {
    index: Arc<SemanticIndex>,
    weather: Arc<WeatherService>,
    generator: Arc<dyn Generator>,
    context_assembler: ContextAssembler,
    top_k: usize,
}

impl RagService {
    /// Wire the pipeline from configuration: CSV catalog, configured
    /// embedding and LLM providers, OpenWeatherMap.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::load_csv(config.catalog_path())?);

        let embedder = Arc::new(EmbeddingService::new(config)?);
        let index = Arc::new(SemanticIndex::new(
            catalog,
            embedder,
            config.catalog.max_documents,
        ));
        let weather = Arc::new(WeatherService::new(config)?);
        let generator = Arc::new(LlmService::new(config)?);

        Ok(Self::from_components(index, weather, generator, &config.rag))
    }

    /// Create from existing components
    #[must_use]
    pub fn from_components(
        index: Arc<SemanticIndex>,
        weather: Arc<WeatherService>,
        generator: Arc<dyn Generator>,
        rag: &RagConfig,
    ) -> Self {
        Self {
            index,
            weather,
            generator,
            context_assembler: ContextAssembler::new(rag.max_context_length),
            top_k: rag.top_k.max(1),
        }
    }

    /// Answer a travel question from the top places and their live weather.
    ///
    /// # Errors
    /// - `InvalidQuery` for a blank question
    /// - `IndexBuild` / `EmbeddingService` when retrieval fails
    /// - `Generation` when the language model call fails
    ///
    /// Weather failures never fail the answer; affected places come back
    /// without weather.
    pub async fn answer(&self, query: &str) -> Result<RagResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(JejuRagError::InvalidQuery("question is empty".to_string()));
        }
        info!("Answering: {}", query);

        debug!("Step 1: Retrieving places");
        let candidates = self.index.search(query, self.top_k).await?;
        debug!("Retrieved {} places", candidates.len());

        debug!("Step 2: Enriching with weather");
        let locations: Vec<PlaceLocation> = candidates.iter().map(location_of).collect();
        let place_weather = self.weather.enrich_places(&locations).await;

        // Duplicate names resolve to the last enriched entry
        let weather_by_name: HashMap<&str, &PlaceWeather> = place_weather
            .iter()
            .map(|pw| (pw.place_name.as_str(), pw))
            .collect();

        debug!("Step 3: Assembling context");
        let context = self.context_assembler.assemble(&candidates, &weather_by_name);

        debug!("Step 4: Generating answer");
        let prompt = TravelPrompts::grounded_answer()
            .render(&HashMap::from([("places", context.as_str()), ("question", query)]));
        let answer = self.generator.generate(&prompt).await.map_err(|e| match e {
            JejuRagError::Generation(_) | JejuRagError::ConfigError(_) => e,
            other => JejuRagError::Generation(other.to_string()),
        })?;

        let places = candidates
            .iter()
            .map(|document| {
                let pw = weather_by_name.get(document.metadata.name.as_str()).copied();
                PlaceWithWeather {
                    id: document.metadata.id.clone(),
                    name: document.metadata.name.clone(),
                    address: document.metadata.address.clone(),
                    category: document.metadata.category.clone(),
                    latitude: document.metadata.latitude,
                    longitude: document.metadata.longitude,
                    weather: pw.map(WeatherSummary::from),
                    region_label: pw.map(|pw| pw.region_label.clone()),
                }
            })
            .collect();

        info!("Answer generated from {} places", candidates.len());

        Ok(RagResponse {
            query: query.to_string(),
            answer,
            context,
            places,
        })
    }

    /// Semantic search without weather or generation
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredDocument>> {
        self.index.search_with_scores(query, limit).await
    }

    /// Build the index ahead of the first question; returns its size
    pub async fn build_index(&self) -> Result<usize> {
        Ok(self.index.build().await?.len())
    }

    pub fn index(&self) -> &SemanticIndex {
        &self.index
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }
}

fn location_of(document: &IndexedDocument) -> PlaceLocation {
    PlaceLocation {
        name: document.metadata.name.clone(),
        latitude: document.metadata.latitude,
        longitude: document.metadata.longitude,
        address: Some(document.metadata.address.clone()),
    }
}
