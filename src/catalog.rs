//! Catalog Store: the in-memory list of places available for retrieval

use std::io::Read;
use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::models::CatalogRow;
use crate::models::PlaceRecord;
use crate::Result;

/// Immutable set of place records loaded from one source.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<PlaceRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<PlaceRecord>) -> Self {
        Self { records }
    }

    /// Load a catalog CSV from disk
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            crate::JejuRagError::Catalog(format!("cannot open {}: {e}", path.display()))
        })?;
        let catalog = Self::from_reader(file)?;
        info!(
            "Loaded {} places from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse catalog CSV from any reader. Rows without a name are skipped;
    /// rows that fail to parse are logged and skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // A file without the name column cannot produce any record
        let headers = csv_reader.headers()?.clone();
        if !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == "장소명") {
            return Err(crate::JejuRagError::Catalog(
                "missing required column 장소명".to_string(),
            ));
        }
        // Strip a UTF-8 BOM from the first header so serde field names match
        let cleaned: csv::StringRecord = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .collect();
        csv_reader.set_headers(cleaned);

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (ordinal, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            match row {
                Ok(row) => match row.into_record(ordinal) {
                    Some(record) => records.push(record),
                    None => skipped += 1,
                },
                Err(e) => {
                    warn!("Skipping malformed catalog row {}: {}", ordinal + 1, e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            info!("Skipped {} catalog rows without a usable name", skipped);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[PlaceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `max` records, in catalog order
    pub fn truncated(&self, max: usize) -> &[PlaceRecord] {
        &self.records[..self.records.len().min(max)]
    }
}
