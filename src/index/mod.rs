//! In-memory semantic index over the place catalog
//!
//! Documents are embedded once, on first use, and kept for the life of the
//! process. Queries are a full scan scored by cosine similarity; catalog sizes
//! here are in the hundreds to low thousands, so no approximate structure is
//! used.

pub mod document;
pub mod similarity;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

pub use document::render_place_text;
pub use document::IndexedDocument;
pub use similarity::cosine_similarity;

use crate::catalog::Catalog;
use crate::embeddings::Embedder;
use crate::errors::JejuRagError;
use crate::errors::Result;

/// A search hit with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: IndexedDocument,
    /// Cosine similarity; `NaN` when undefined
    pub score: f32,
}

/// A fully built, immutable generation of the index
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    documents: Vec<IndexedDocument>,
}

impl IndexSnapshot {
    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Embedding length, taken from the first document
    pub fn dimension(&self) -> Option<usize> {
        self.documents.first().map(|d| d.embedding.len())
    }

    /// Score every document against `query_embedding` and return the best `k`.
    /// Ties keep build order.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<(usize, f32)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| (idx, cosine_similarity(query_embedding, &doc.embedding)))
            .collect();

        // sort_by is stable, so equal scores stay in build order
        scored.sort_by(|a, b| similarity::descending_nan_last(a.1, b.1));

        scored
            .into_iter()
            .take(k)
            .map(|(idx, score)| ScoredDocument {
                document: self.documents[idx].clone(),
                score,
            })
            .collect()
    }
}

/// Semantic index with build-once, publish-atomically semantics
pub struct SemanticIndex {
    catalog: Arc<Catalog>,
    embedder: Arc<dyn Embedder>,
    max_documents: usize,
    published: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl SemanticIndex {
    /// Create an unbuilt index over the first `max_documents` catalog records
    pub fn new(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>, max_documents: usize) -> Self {
        Self {
            catalog,
            embedder,
            max_documents,
            published: RwLock::new(None),
        }
    }

    /// Return the published index, building it first if needed.
    ///
    /// Concurrent first callers may each build a snapshot; the first one to
    /// finish is published and the others are dropped. A failed build
    /// publishes nothing.
    pub async fn build(&self) -> Result<Arc<IndexSnapshot>> {
        if let Some(snapshot) = self.published.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let built = Arc::new(self.build_snapshot().await?);

        let mut slot = self.published.write().await;
        if let Some(existing) = slot.as_ref() {
            debug!("Index already published by a concurrent build; discarding duplicate");
            return Ok(Arc::clone(existing));
        }
        *slot = Some(Arc::clone(&built));
        info!("Semantic index published with {} documents", built.len());
        Ok(built)
    }

    /// Discard the current index and build a fresh one.
    ///
    /// The old snapshot keeps serving until the new one is complete.
    pub async fn rebuild(&self) -> Result<Arc<IndexSnapshot>> {
        let built = Arc::new(self.build_snapshot().await?);
        *self.published.write().await = Some(Arc::clone(&built));
        info!("Semantic index rebuilt with {} documents", built.len());
        Ok(built)
    }

    pub async fn is_built(&self) -> bool {
        self.published.read().await.is_some()
    }

    /// Number of published documents, 0 when unbuilt
    pub async fn len(&self) -> usize {
        self.published
            .read()
            .await
            .as_ref()
            .map_or(0, |snapshot| snapshot.len())
    }

    /// Top-`k` documents for `query`, most similar first
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<IndexedDocument>> {
        Ok(self
            .search_with_scores(query, k)
            .await?
            .into_iter()
            .map(|hit| hit.document)
            .collect())
    }

    /// Like [`search`](Self::search) but keeps the similarity score
    pub async fn search_with_scores(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 {
            return Err(JejuRagError::InvalidQuery(
                "k must be at least 1".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(JejuRagError::InvalidQuery("query is empty".to_string()));
        }

        let snapshot = self.build().await?;
        if snapshot.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await.map_err(|e| match e {
            JejuRagError::EmbeddingService(_) => e,
            other => JejuRagError::EmbeddingService(other.to_string()),
        })?;

        if let Some(dimension) = snapshot.dimension() {
            if dimension != query_embedding.len() {
                return Err(JejuRagError::EmbeddingService(format!(
                    "query embedding has {} dimensions, index has {}",
                    query_embedding.len(),
                    dimension
                )));
            }
        }

        let hits = snapshot.rank(&query_embedding, k);
        debug!(
            "Search '{}' scored {} documents, returning {}",
            query,
            snapshot.len(),
            hits.len()
        );
        Ok(hits)
    }

    async fn build_snapshot(&self) -> Result<IndexSnapshot> {
        let records = self.catalog.truncated(self.max_documents);
        info!(
            "Building semantic index over {} of {} places",
            records.len(),
            self.catalog.len()
        );

        let texts: Vec<String> = records.iter().map(render_place_text).collect();

        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| JejuRagError::IndexBuild(e.to_string()))?;

        if embeddings.len() != records.len() {
            return Err(JejuRagError::IndexBuild(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                records.len()
            )));
        }

        let documents = records
            .iter()
            .zip(texts)
            .zip(embeddings)
            .map(|((record, text), embedding)| IndexedDocument {
                text,
                metadata: record.metadata(),
                embedding,
            })
            .collect();

        Ok(IndexSnapshot { documents })
    }
}
