//! Context assembly from retrieved places

use std::collections::HashMap;

use crate::index::IndexedDocument;
use crate::weather::recommend;
use crate::weather::PlaceWeather;

/// Builds the grounding context handed to the language model
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    /// `max_context_length` is measured in characters
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// One block per place, in rank order, with weather lines when known.
    ///
    /// Blocks that would push the context past the limit are dropped along with
    /// everything after them. The first block is always kept so the answer
    /// stays grounded.
    #[must_use]
    pub fn assemble(
        &self,
        documents: &[IndexedDocument],
        weather_by_name: &HashMap<&str, &PlaceWeather>,
    ) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(documents.len());
        let mut total_length = 0;

        for (idx, document) in documents.iter().enumerate() {
            let mut block = format!("[장소 {}]\n{}", idx + 1, document.text);
            if let Some(place_weather) = weather_by_name.get(document.metadata.name.as_str()) {
                block.push('\n');
                block.push_str(&format_weather(place_weather));
            }

            let separator = if blocks.is_empty() { 0 } else { 2 };
            let block_length = block.chars().count() + separator;
            if !blocks.is_empty() && total_length + block_length > self.max_context_length {
                break;
            }

            total_length += block_length;
            blocks.push(block);
        }

        blocks.join("\n\n")
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(8000)
    }
}

fn format_weather(place_weather: &PlaceWeather) -> String {
    let weather = &place_weather.weather;
    format!(
        "현재 날씨 ({} 지역): {}°C, {} (체감 {}°C)\n습도: {}%, 풍속: {}m/s\n날씨 추천: {}",
        place_weather.region_label,
        weather.temperature,
        weather.description,
        weather.feels_like,
        weather.humidity,
        weather.wind_speed,
        recommend(weather)
    )
}
