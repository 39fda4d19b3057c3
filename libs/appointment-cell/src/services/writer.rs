use std::sync::Arc;
use tracing::{error, info};

use shared_config::clamp_batch_size;
use shared_database::{DocumentStore, Fields};

use crate::models::{AppointmentCandidate, AppointmentError, ChunkReport};

/// Persists candidates as sequential atomic commits of at most `batch_size` documents.
pub struct AppointmentWriter {
    store: Arc<dyn DocumentStore>,
    collection: String,
    batch_size: usize,
}

impl AppointmentWriter {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>, batch_size: usize) -> Self {
        Self {
            store,
            collection: collection.into(),
            batch_size: clamp_batch_size(batch_size),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Writes chunk after chunk, stopping at the first failure.
    /// Chunks committed before the failure stay committed.
    pub async fn write<F>(
        &self,
        candidates: &[AppointmentCandidate],
        mut on_chunk: F,
    ) -> Result<Vec<ChunkReport>, AppointmentError>
    where
        F: FnMut(&ChunkReport),
    {
        let mut reports = Vec::with_capacity(candidates.len().div_ceil(self.batch_size));

        for (position, chunk) in candidates.chunks(self.batch_size).enumerate() {
            let index = position + 1;
            let documents: Vec<Fields> = chunk.iter().map(AppointmentCandidate::to_document).collect();

            let result = self
                .store
                .batch_create(&self.collection, &documents)
                .await
                .map_err(|e| {
                    error!("Batch {} of {} documents failed: {:#}", index, documents.len(), e);
                    AppointmentError::BatchWriteFailed {
                        chunk: index,
                        message: e.to_string(),
                    }
                })?;

            let report = ChunkReport {
                index,
                documents: chunk.len(),
                document_ids: result.document_ids,
            };
            info!("Batch {} committed to {} ({} docs)", index, self.collection, report.documents);

            on_chunk(&report);
            reports.push(report);
        }

        Ok(reports)
    }
}
