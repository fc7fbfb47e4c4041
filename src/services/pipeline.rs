// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Import pipeline.
//!
//! Handles one run end to end:
//! 1. Look for a new export archive and unpack it
//! 2. Extract running workouts and VO2 max samples
//! 3. Join samples into workouts and clean the rows
//! 4. Write the cleaned CSV
//! 5. Load runs newer than the table's latest date

use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::db::RunStore;
use crate::error::Result;
use crate::models::RunSchema;
use crate::services::archive::{ArchiveLocator, LocateOutcome};
use crate::services::loader::{IncrementalLoader, LoadReport};
use crate::services::normalizer::{normalize_all, RowErrorPolicy};
use crate::services::{cleaned_csv, enricher, extractor};

/// Counts from cleaning one export document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanSummary {
    pub workouts_found: usize,
    pub samples_found: usize,
    pub rows_cleaned: usize,
    pub rows_dropped: usize,
    pub rows_skipped: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub archive: LocateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<CleanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadReport>,
}

/// Clean the export document at `document` into the CSV at `csv_path`.
pub fn clean_export(document: &Path, csv_path: &Path, policy: RowErrorPolicy) -> Result<CleanSummary> {
    let extraction = extractor::extract_from_path(document)?;
    let enriched = enricher::enrich_all(&extraction.workouts, &extraction.samples)?;
    let normalized = normalize_all(&enriched, policy)?;
    cleaned_csv::write_rows(csv_path, &normalized.rows)?;

    Ok(CleanSummary {
        workouts_found: extraction.workouts.len(),
        samples_found: extraction.samples.len(),
        rows_cleaned: normalized.rows.len(),
        rows_dropped: normalized.dropped,
        rows_skipped: normalized.skipped,
    })
}

/// Runs the import against one store.
pub struct ImportPipeline<S> {
    config: Config,
    store: S,
}

impl<S: RunStore> ImportPipeline<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn policy(&self) -> RowErrorPolicy {
        if self.config.skip_invalid_rows {
            RowErrorPolicy::Skip
        } else {
            RowErrorPolicy::Abort
        }
    }

    /// Run once. Returns early with only the archive outcome when there is
    /// no new export.
    pub async fn run(&self) -> Result<ImportReport> {
        let archive = ArchiveLocator::new(&self.config).refresh();
        if !archive.is_new_data() {
            return Ok(ImportReport {
                archive,
                clean: None,
                load: None,
            });
        }

        let csv_path = self.config.cleaned_csv();
        let clean = clean_export(&self.config.raw_document(), &csv_path, self.policy())?;
        let load = self.load_csv(&csv_path).await?;

        tracing::info!(
            cleaned = clean.rows_cleaned,
            inserted = load.inserted,
            "Import finished"
        );

        Ok(ImportReport {
            archive,
            clean: Some(clean),
            load: Some(load),
        })
    }

    /// Load a cleaned CSV into the configured table.
    pub async fn load_csv(&self, csv_path: &Path) -> Result<LoadReport> {
        let schema = RunSchema::get();
        self.store.ensure_table(&self.config.table, schema).await?;
        let rows = cleaned_csv::read_rows(csv_path)?;
        IncrementalLoader::new(&self.store, &self.config.table, schema)
            .load(rows)
            .await
    }
}
