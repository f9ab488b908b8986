//! CLI output formatting utilities

use crate::index::ScoredDocument;
use crate::weather::recommend;
use crate::weather::WeatherSnapshot;
use crate::AppConfig;

/// Truncate at a character boundary, appending "..." when shortened
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Similarity for display; undefined scores show as "n/a"
#[must_use]
pub fn format_score(score: f32) -> String {
    if score.is_nan() {
        "n/a".to_string()
    } else {
        format!("{score:.3}")
    }
}

pub fn print_search_results(query: &str, hits: &[ScoredDocument]) {
    println!("🔍 Results for \"{query}\" ({} found)", hits.len());
    println!();

    if hits.is_empty() {
        println!("  No places found.");
        return;
    }

    for (idx, hit) in hits.iter().enumerate() {
        let metadata = &hit.document.metadata;
        println!(
            "  {}. {} (score: {})",
            idx + 1,
            metadata.name,
            format_score(hit.score)
        );
        if !metadata.address.is_empty() {
            println!("     {}", truncate_str(&metadata.address, 60));
        }
    }
}

pub fn print_weather(region: &str, latitude: f64, longitude: f64, weather: &WeatherSnapshot) {
    println!("🌤️  {region} ({latitude:.4}, {longitude:.4})");
    println!(
        "  {}°C (체감 {}°C), {}",
        weather.temperature, weather.feels_like, weather.description
    );
    println!("  습도: {}%, 풍속: {}m/s", weather.humidity, weather.wind_speed);
    println!("  추천: {}", recommend(weather));
}

pub fn print_config(config: &AppConfig) {
    let config = config.masked();

    println!("📋 jejurag Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!();

    println!("📚 Catalog:");
    println!("  Path: {}", config.catalog.path);
    println!("  Max documents: {}", config.catalog.max_documents);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embeddings.model);
    println!("  API key: {}", display_key(&config.embeddings.api_key));
    println!("  Batch size: {}", config.embeddings.batch_size);
    println!();

    println!("🤖 LLM:");
    println!("  Provider: {}", config.llm.provider);
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm.model);
    println!("  API key: {}", display_key(&config.llm.api_key));
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);
    println!();

    println!("🌦️  Weather:");
    println!("  Endpoint: {}", config.weather.endpoint);
    println!("  API key: {}", display_key(&config.weather.api_key));
    println!("  Units / lang: {} / {}", config.weather.units, config.weather.lang);
    println!("  Cache TTL: {}s", config.weather.cache_ttl_secs);
    println!("  Concurrent lookups: {}", config.weather.max_concurrent_lookups);
    println!();

    println!("🔎 RAG:");
    println!("  Top K: {}", config.rag.top_k);
    println!("  Max context length: {}", config.rag.max_context_length);
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
}

fn display_key(key: &str) -> &str {
    if key.is_empty() {
        "(from environment)"
    } else {
        key
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
