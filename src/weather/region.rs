//! Short region labels derived from Jeju addresses

use regex::Regex;

use crate::errors::JejuRagError;
use crate::errors::Result;

/// Maps an address to a display label. Must be total: it always returns a label.
pub trait RegionPolicy: Send + Sync {
    fn label(&self, address: &str, fallback: &str) -> String;
}

/// City followed by a town, township or neighborhood token
const DISTRICT_PATTERN: &str = r"(?:제주시|서귀포시)\s+(\S+?(?:읍|면|동))";

/// Jeju addresses: `서귀포시 성산읍 ...` labels as `성산`.
#[derive(Debug, Clone)]
pub struct JejuRegions {
    district: Regex,
}

impl JejuRegions {
    pub fn new() -> Result<Self> {
        let district = Regex::new(DISTRICT_PATTERN)
            .map_err(|e| JejuRagError::ConfigError(format!("invalid region pattern: {e}")))?;
        Ok(Self { district })
    }
}

impl RegionPolicy for JejuRegions {
    fn label(&self, address: &str, fallback: &str) -> String {
        if let Some(token) = self.district.captures(address).and_then(|c| c.get(1)) {
            return strip_district_suffix(token.as_str()).to_string();
        }

        if address.contains("서귀포") {
            "서귀포".to_string()
        } else if address.contains("제주시") {
            "제주시".to_string()
        } else {
            fallback.to_string()
        }
    }
}

/// `성산읍` → `성산`; single-syllable stems keep the suffix (`연동` stays `연동`)
fn strip_district_suffix(token: &str) -> &str {
    let stem = token
        .strip_suffix('읍')
        .or_else(|| token.strip_suffix('면'))
        .or_else(|| token.strip_suffix('동'));

    match stem {
        Some(stem) if stem.chars().count() >= 2 => stem,
        _ => token,
    }
}
