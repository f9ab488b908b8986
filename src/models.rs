use serde::Deserialize;
use serde::Serialize;

/// A place in the travel catalog.
///
/// Created once at load time and never mutated afterwards. Missing or
/// unparseable coordinates are stored as `0.0` and such places are skipped by
/// weather enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Road-name address, the alternate form of `address`
    pub road_address: String,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl PlaceRecord {
    /// Whether the record carries usable coordinates
    pub fn has_coordinates(&self) -> bool {
        has_coordinates(self.latitude, self.longitude)
    }

    /// Read-only projection stored alongside an indexed document
    pub fn metadata(&self) -> PlaceMetadata {
        PlaceMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            category: self.category.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Metadata copied out of a [`PlaceRecord`] at index build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMetadata {
    pub id: String,
    pub name: String,
    pub address: String,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Zero means "absent" in the source data.
pub(crate) fn has_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite() && longitude.is_finite() && latitude != 0.0 && longitude != 0.0
}

/// One raw row of the catalog CSV.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "장소아이디", default)]
    pub id: Option<String>,
    #[serde(rename = "장소명", default)]
    pub name: Option<String>,
    #[serde(rename = "지번주소", default)]
    pub address: Option<String>,
    #[serde(rename = "도로명주소", default)]
    pub road_address: Option<String>,
    #[serde(rename = "분류", default)]
    pub category: Option<String>,
    #[serde(rename = "위도", default)]
    pub latitude: Option<String>,
    #[serde(rename = "경도", default)]
    pub longitude: Option<String>,
    #[serde(rename = "등록일시", default)]
    pub created_at: Option<String>,
    #[serde(rename = "수정일시", default)]
    pub updated_at: Option<String>,
}

impl CatalogRow {
    /// Convert to a record, or `None` when the row has no name.
    pub fn into_record(self, ordinal: usize) -> Option<PlaceRecord> {
        let name = trimmed(self.name);
        if name.is_empty() {
            return None;
        }

        let id = trimmed(self.id);
        let category = trimmed(self.category);

        Some(PlaceRecord {
            id: if id.is_empty() { ordinal.to_string() } else { id },
            name,
            address: trimmed(self.address),
            road_address: trimmed(self.road_address),
            category: (!category.is_empty()).then_some(category),
            latitude: parse_coordinate(self.latitude.as_deref()),
            longitude: parse_coordinate(self.longitude.as_deref()),
            created_at: trimmed(self.created_at),
            updated_at: trimmed(self.updated_at),
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_coordinate(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
