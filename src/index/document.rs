//! Indexed documents and their text rendering

use serde::Serialize;

use crate::models::PlaceMetadata;
use crate::models::PlaceRecord;

/// One catalog entry as stored in the semantic index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedDocument {
    /// Rendered text body; both the embedding input and what callers read
    pub text: String,
    pub metadata: PlaceMetadata,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Render the text body for a place.
///
/// Deterministic: the same record always renders to the same string. Empty
/// fields are left out; coordinates only appear when both are present.
pub fn render_place_text(place: &PlaceRecord) -> String {
    let mut lines = vec![format!("장소명: {}", place.name)];

    if let Some(category) = &place.category {
        lines.push(format!("분류: {category}"));
    }
    if !place.address.is_empty() {
        lines.push(format!("주소: {}", place.address));
    }
    if !place.road_address.is_empty() {
        lines.push(format!("도로명주소: {}", place.road_address));
    }
    if place.has_coordinates() {
        lines.push(format!(
            "위도: {}, 경도: {}",
            place.latitude, place.longitude
        ));
    }
    if !place.created_at.is_empty() {
        lines.push(format!("등록일시: {}", place.created_at));
    }
    if !place.updated_at.is_empty() {
        lines.push(format!("수정일시: {}", place.updated_at));
    }

    lines.join("\n")
}
