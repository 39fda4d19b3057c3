use std::sync::Arc;
use tracing::info;

use shared_config::AppConfig;
use shared_database::DocumentStore;

use crate::models::{AppointmentCandidate, AppointmentError, ChunkReport, SeedPlan, SeedReport};
use crate::services::dedup::deduplicate;
use crate::services::generator::AppointmentGenerator;
use crate::services::reference::ReferenceTables;
use crate::services::writer::AppointmentWriter;

/// Candidates that survived deduplication, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeed {
    pub generated: usize,
    pub kept: Vec<AppointmentCandidate>,
    pub skipped: usize,
}

/// Generation and dedup only; touches no store.
pub fn prepare_seed(tables: ReferenceTables<'_>, plan: &SeedPlan) -> Result<PreparedSeed, AppointmentError> {
    let generator = AppointmentGenerator::new(tables)?;
    let candidates = generator.generate(plan)?;
    let generated = candidates.len();

    let outcome = deduplicate(candidates);
    info!("Generated {} candidates, kept {}, skipped {} duplicates",
          generated, outcome.kept.len(), outcome.skipped);

    Ok(PreparedSeed {
        generated,
        kept: outcome.kept,
        skipped: outcome.skipped,
    })
}

/// Resolves the plan from `SEED_MONTHS`, falling back to the November/December 2025 scenario.
pub fn plan_from_config(config: &AppConfig) -> Result<SeedPlan, AppointmentError> {
    match config.seed_months.as_deref() {
        Some(raw) => raw.parse(),
        None => Ok(SeedPlan::default()),
    }
}

pub struct SeedingService {
    tables: ReferenceTables<'static>,
    writer: AppointmentWriter,
}

impl SeedingService {
    pub fn new(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            tables: ReferenceTables::builtin(),
            writer: AppointmentWriter::new(store, config.appointments_collection.clone(), config.batch_size),
        }
    }

    pub fn with_tables(mut self, tables: ReferenceTables<'static>) -> Self {
        self.tables = tables;
        self
    }

    pub fn prepare(&self, plan: &SeedPlan) -> Result<PreparedSeed, AppointmentError> {
        prepare_seed(self.tables, plan)
    }

    /// Writes an already prepared seed.
    pub async fn write<F>(&self, prepared: &PreparedSeed, on_chunk: F) -> Result<SeedReport, AppointmentError>
    where
        F: FnMut(&ChunkReport),
    {
        let chunks = self.writer.write(&prepared.kept, on_chunk).await?;

        Ok(SeedReport {
            generated: prepared.generated,
            kept: prepared.kept.len(),
            skipped: prepared.skipped,
            chunks: chunks.len(),
        })
    }

    pub async fn seed<F>(&self, plan: &SeedPlan, on_chunk: F) -> Result<SeedReport, AppointmentError>
    where
        F: FnMut(&ChunkReport),
    {
        let prepared = self.prepare(plan)?;
        self.write(&prepared, on_chunk).await
    }
}
