use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, info_span};

use crate::app::ports::{CanonicalStorePort, RawSourcePort};
use crate::config::NormalizeConfig;
use crate::constants::PREVIEW_ROWS;
use crate::pipeline::ingestion::read_raw_table;
use crate::pipeline::{Pipeline, RunStats};

/// Summary of one normalization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub source: String,
    pub output: String,
    /// Hex SHA-256 of the raw snapshot bytes
    pub source_sha256: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: RunStats,
}

/// Use case for turning the raw registry into the canonical store
pub struct NormalizeUseCase {
    source: Box<dyn RawSourcePort>,
    store: Box<dyn CanonicalStorePort>,
    pipeline: Pipeline,
}

impl NormalizeUseCase {
    pub fn new(
        source: Box<dyn RawSourcePort>,
        store: Box<dyn CanonicalStorePort>,
        settings: NormalizeConfig,
    ) -> Self {
        Self {
            source,
            store,
            pipeline: Pipeline::new(settings),
        }
    }

    pub fn with_pipeline(
        source: Box<dyn RawSourcePort>,
        store: Box<dyn CanonicalStorePort>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            source,
            store,
            pipeline,
        }
    }

    /// Read, normalize and publish. Any error leaves the store as it was.
    pub fn run(&self) -> Result<RunReport> {
        let source = self.source.describe();
        let output = self.store.describe();
        let span = info_span!("normalize", source = %source, output = %output);
        let _enter = span.enter();
        let started_at = Utc::now();

        let bytes = self
            .source
            .read()
            .with_context(|| format!("Failed to read raw registry from {}", source))?;
        crate::observability::metrics::ingest::bytes_read(bytes.len());
        let source_sha256 = hex::encode(Sha256::digest(&bytes));

        let table = read_raw_table(&bytes)
            .with_context(|| format!("{} is not a readable registry table", source))?;
        crate::observability::metrics::ingest::rows_read(table.rows.len());
        info!(rows = table.rows.len(), columns = table.columns.len(), "Raw registry loaded");

        let result = self
            .pipeline
            .run(table)
            .with_context(|| format!("Failed to normalize {}", source))?;

        if let Err(e) = self.store.publish(&result.table) {
            crate::observability::metrics::store::publish_error();
            return Err(e).with_context(|| format!("Failed to publish canonical store {}", output));
        }
        crate::observability::metrics::store::publish_success(result.table.len());

        for entity in result.table.entities.iter().take(PREVIEW_ROWS) {
            info!(
                hotel_id = entity.hotel_id.as_deref().unwrap_or(""),
                name = entity.name.as_deref().unwrap_or(""),
                district = %entity.district,
                accommodation_type = %entity.accommodation_type,
                rooms = entity.rooms,
                latitude = entity.latitude,
                longitude = entity.longitude,
                "Preview"
            );
        }

        Ok(RunReport {
            source,
            output,
            source_sha256,
            started_at,
            finished_at: Utc::now(),
            stats: result.stats,
        })
    }
}
