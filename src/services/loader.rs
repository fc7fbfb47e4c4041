// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Incremental load of cleaned runs.
//!
//! Only runs dated strictly after the newest stored run are inserted, one
//! row per statement. A failed insert stops the load; rows inserted before
//! it stay in the table.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::RunStore;
use crate::error::{PipelineError, Result};
use crate::models::{CleanRow, RunSchema};
use crate::time_utils::{format_duration, format_pace};

/// Outcome of one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Newest stored date before the load
    pub last_date: Option<NaiveDate>,
    pub inserted: usize,
    /// Rows on or before `last_date`
    pub already_present: usize,
}

/// Appends new runs to one table.
pub struct IncrementalLoader<'a, S> {
    store: &'a S,
    table: &'a str,
    schema: &'a RunSchema,
}

impl<'a, S: RunStore> IncrementalLoader<'a, S> {
    pub fn new(store: &'a S, table: &'a str, schema: &'a RunSchema) -> Self {
        Self {
            store,
            table,
            schema,
        }
    }

    /// Insert the rows newer than the table's latest date.
    pub async fn load(&self, mut rows: Vec<CleanRow>) -> Result<LoadReport> {
        let last_date = self.store.max_date(self.table).await?;
        let total = rows.len();
        if let Some(last) = last_date {
            rows.retain(|row| row.date > last);
        }
        rows.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));

        tracing::info!(
            table = self.table,
            last_date = ?last_date,
            new = rows.len(),
            total,
            "Loading new runs"
        );

        let columns = self.schema.column_names();
        let mut inserted = 0;
        for row in &rows {
            self.store
                .insert_row(self.table, &columns, &row.to_cells())
                .await
                .map_err(|e| PipelineError::Insert {
                    date: row.date,
                    inserted,
                    message: e.to_string(),
                })?;
            inserted += 1;

            let pace = row.pace.map(format_pace).unwrap_or_else(|| "-".to_string());
            tracing::debug!(
                date = %row.date,
                duration = %format_duration(row.duration),
                pace = %pace,
                "Inserted run"
            );
        }

        Ok(LoadReport {
            last_date,
            inserted,
            already_present: total - rows.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use chrono::NaiveTime;

    fn row(y: i32, m: u32, d: u32) -> CleanRow {
        CleanRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            distance: Some(8.0),
            duration: 65.0,
            pace: Some(8.13),
            calories: None,
            vo2_max: None,
            avg_hr: None,
            max_hr: None,
            min_hr: None,
            elevation: None,
            temperature: None,
            humidity: None,
        }
    }

    async fn store_with(rows: Vec<CleanRow>) -> MemoryStore {
        let store = MemoryStore::new();
        store.ensure_table("runs", RunSchema::get()).await.unwrap();
        IncrementalLoader::new(&store, "runs", RunSchema::get())
            .load(rows)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_only_newer_rows_inserted() {
        let store = store_with(vec![row(2024, 1, 1)]).await;
        let loader = IncrementalLoader::new(&store, "runs", RunSchema::get());

        let report = loader
            .load(vec![row(2023, 12, 31), row(2024, 1, 2)])
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.already_present, 1);
        assert_eq!(report.last_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(
            store.dates("runs"),
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_table_takes_everything() {
        let store = store_with(vec![]).await;
        let loader = IncrementalLoader::new(&store, "runs", RunSchema::get());
        let report = loader
            .load(vec![row(2024, 1, 3), row(2023, 5, 1)])
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.last_date, None);
        // Stored oldest first
        assert_eq!(
            store.dates("runs")[0],
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_second_load_is_noop() {
        let rows = vec![row(2024, 1, 2), row(2024, 1, 5)];
        let store = store_with(rows.clone()).await;
        let report = IncrementalLoader::new(&store, "runs", RunSchema::get())
            .load(rows)
            .await
            .unwrap();
        assert_eq!(report.inserted, 0);
        assert_eq!(report.already_present, 2);
        assert_eq!(store.rows("runs").len(), 2);
    }

    #[tokio::test]
    async fn test_same_day_as_last_is_skipped() {
        let store = store_with(vec![row(2024, 1, 2)]).await;
        let mut later_same_day = row(2024, 1, 2);
        later_same_day.start_time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let report = IncrementalLoader::new(&store, "runs", RunSchema::get())
            .load(vec![later_same_day])
            .await
            .unwrap();
        assert_eq!(report.inserted, 0);
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_earlier_rows() {
        let store = MemoryStore::with_unique_dates();
        store.ensure_table("runs", RunSchema::get()).await.unwrap();
        let rows = vec![
            row(2024, 1, 1),
            row(2024, 1, 2),
            row(2024, 1, 2),
            row(2024, 1, 3),
        ];

        let err = IncrementalLoader::new(&store, "runs", RunSchema::get())
            .load(rows)
            .await
            .unwrap_err();

        match err {
            PipelineError::Insert { date, inserted, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert_eq!(inserted, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.rows("runs").len(), 2);
    }

    #[tokio::test]
    async fn test_null_values_reach_store_as_none() {
        let store = store_with(vec![row(2024, 1, 2)]).await;
        let stored = &store.rows("runs")[0];
        assert_eq!(stored.len(), 13);
        assert_eq!(stored[3].as_deref(), Some("65.00"));
        assert_eq!(stored[6], None);
    }
}
