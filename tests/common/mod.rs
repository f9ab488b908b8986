//! Shared fixtures: a small CSV catalog and stub collaborators

#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use jejurag::catalog::Catalog;
use jejurag::config::RagConfig;
use jejurag::embeddings::Embedder;
use jejurag::index::SemanticIndex;
use jejurag::llm::Generator;
use jejurag::rag::RagService;
use jejurag::weather::JejuRegions;
use jejurag::weather::ManualClock;
use jejurag::weather::ProviderWeather;
use jejurag::weather::WeatherFetcher;
use jejurag::weather::WeatherService;
use jejurag::JejuRagError;
use jejurag::Result;

pub const CATALOG_CSV: &str = "\
장소아이디,장소명,지번주소,도로명주소,분류,위도,경도,등록일시,수정일시
1,협재 해변,제주시 한림읍 협재리 2497-1,,바다 해변 카페,33.3940,126.2397,2024-01-01,2024-05-01
2,국립제주박물관,제주시 일도이동 261,,박물관,33.5133,126.5490,,
3,성산일출봉,서귀포시 성산읍 성산리 1,,오름,33.4612,126.9425,,
4,광치기해변,서귀포시 성산읍 고성리 224-33,,해변,33.4511,126.9205,,
5,좌표없는 카페,제주시 연동 7길,,카페,,,,
6,산굼부리,제주시 조천읍 교래리,,오름,33.4316,126.6923,,
";

/// Write the fixture catalog to a temp file and load it back
pub fn load_catalog() -> Result<Arc<Catalog>> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(CATALOG_CSV.as_bytes())?;
    Ok(Arc::new(Catalog::load_csv(file.path())?))
}

/// One axis per keyword; a text lights up every axis it mentions.
pub struct KeywordEmbedder {
    pub fail_batch: bool,
}

impl KeywordEmbedder {
    const AXES: [&'static str; 5] = ["바다", "카페", "해변", "오름", "박물관"];

    fn vector(text: &str) -> Vec<f32> {
        Self::AXES
            .iter()
            .map(|axis| if text.contains(axis) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(Self::vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail_batch {
            return Err(JejuRagError::EmbeddingService("503 Service Unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }
}

/// Fixed clear weather; fails for rounded latitudes in `fail_latitudes`
pub struct StubWeather {
    pub calls: AtomicUsize,
    pub fail_latitudes: Vec<f64>,
}

impl StubWeather {
    pub fn new(fail_latitudes: Vec<f64>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_latitudes,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherFetcher for StubWeather {
    async fn fetch(&self, latitude: f64, _longitude: f64) -> Result<ProviderWeather> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_latitudes.iter().any(|l| (l - latitude).abs() < 1e-9) {
            return Err(JejuRagError::WeatherFetch("502: bad gateway".to_string()));
        }
        Ok(ProviderWeather {
            temperature: 23.4,
            feels_like: 24.1,
            condition_code: 800,
            condition_text: "맑음".to_string(),
            humidity: 55,
            wind_speed: 3.5,
            icon_code: "01d".to_string(),
        })
    }
}

/// Records prompts and answers with a canned reply
pub struct StubGenerator {
    pub prompts: Mutex<Vec<String>>,
    pub fail: bool,
}

impl StubGenerator {
    pub fn new(fail: bool) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail,
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(JejuRagError::Generation("429 quota exceeded".to_string()));
        }
        Ok("맑은 날에는 협재 해변을 추천합니다.".to_string())
    }
}

pub struct Fixture {
    pub service: Arc<RagService>,
    pub weather: Arc<StubWeather>,
    pub generator: Arc<StubGenerator>,
}

pub struct FixtureOptions {
    pub fail_embedding: bool,
    pub fail_generation: bool,
    pub fail_weather_latitudes: Vec<f64>,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            fail_embedding: false,
            fail_generation: false,
            fail_weather_latitudes: Vec::new(),
        }
    }
}

pub fn fixture(options: FixtureOptions) -> Result<Fixture> {
    let index = Arc::new(SemanticIndex::new(
        load_catalog()?,
        Arc::new(KeywordEmbedder {
            fail_batch: options.fail_embedding,
        }),
        1000,
    ));

    let weather = Arc::new(StubWeather::new(options.fail_weather_latitudes));
    let weather_service = Arc::new(WeatherService::from_components(
        weather.clone(),
        Arc::new(ManualClock::new(Utc::now())),
        Arc::new(JejuRegions::new()?),
        Duration::minutes(10),
        4,
    ));

    let generator = Arc::new(StubGenerator::new(options.fail_generation));
    let service = Arc::new(RagService::from_components(
        index,
        weather_service,
        generator.clone(),
        &RagConfig::default(),
    ));

    Ok(Fixture {
        service,
        weather,
        generator,
    })
}
