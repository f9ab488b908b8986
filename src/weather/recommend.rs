//! Weather-based activity suggestions

use std::fmt;

use serde::Serialize;

use super::types::WeatherSnapshot;

/// At or above this many °C, outdoor sun is avoided
pub const HOT_THRESHOLD_C: i32 = 30;
/// At or below this many °C, outdoor cold is avoided
pub const COLD_THRESHOLD_C: i32 = 5;

/// What kind of outing suits the current weather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Indoor,
    AvoidHeat,
    AvoidCold,
    Mixed,
    Outdoor,
}

impl Recommendation {
    /// First matching rule wins: rain, heat, cold, clouds, otherwise outdoors.
    pub fn for_weather(weather: &WeatherSnapshot) -> Self {
        if weather.is_precipitating {
            Self::Indoor
        } else if weather.temperature >= HOT_THRESHOLD_C {
            Self::AvoidHeat
        } else if weather.temperature <= COLD_THRESHOLD_C {
            Self::AvoidCold
        } else if weather.is_overcast {
            Self::Mixed
        } else {
            Self::Outdoor
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Indoor => "비가 오고 있어 실내 관광지, 박물관, 카페를 추천합니다.",
            Self::AvoidHeat => "매우 더워서 해변, 동굴, 실내 시설을 추천합니다.",
            Self::AvoidCold => "매우 추워서 따뜻한 실내 관광지, 온천, 카페를 추천합니다.",
            Self::Mixed => "흐린 날씨라 실내외 모두 좋고, 오름이나 해안도로도 괜찮습니다.",
            Self::Outdoor => "맑은 날씨라 야외 활동, 해변, 오름 트레킹을 추천합니다.",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Suggestion text for a snapshot
pub fn recommend(weather: &WeatherSnapshot) -> &'static str {
    Recommendation::for_weather(weather).message()
}
