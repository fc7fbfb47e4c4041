// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory run store (offline mode and tests).

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::db::RunStore;
use crate::error::PipelineError;
use crate::models::RunSchema;

type Rows = Vec<Vec<Option<String>>>;

/// Rows kept in memory, keyed by table name.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Rows>>>,
    unique_dates: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject a second row with the same `date`, like a UNIQUE index would.
    pub fn with_unique_dates() -> Self {
        Self {
            unique_dates: true,
            ..Self::default()
        }
    }

    /// Snapshot of a table's rows in insertion order.
    pub fn rows(&self, table: &str) -> Rows {
        self.lock()
            .map(|tables| tables.get(table).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Dates of a table's rows in insertion order.
    pub fn dates(&self, table: &str) -> Vec<NaiveDate> {
        self.rows(table)
            .iter()
            .filter_map(|row| row_date(row))
            .collect()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, Rows>>, PipelineError> {
        self.tables
            .lock()
            .map_err(|_| PipelineError::Database("Memory store poisoned".to_string()))
    }
}

/// The date column is always first.
fn row_date(row: &[Option<String>]) -> Option<NaiveDate> {
    row.first()?
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

impl RunStore for MemoryStore {
    async fn ensure_table(&self, table: &str, _schema: &RunSchema) -> Result<(), PipelineError> {
        self.lock()?.entry(table.to_string()).or_default();
        Ok(())
    }

    async fn max_date(&self, table: &str) -> Result<Option<NaiveDate>, PipelineError> {
        let tables = self.lock()?;
        let rows = tables
            .get(table)
            .ok_or_else(|| PipelineError::Database(format!("Table '{}' doesn't exist", table)))?;
        Ok(rows.iter().filter_map(|row| row_date(row)).max())
    }

    async fn insert_row(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Option<String>],
    ) -> Result<(), PipelineError> {
        if columns.first() != Some(&"date") || columns.len() != values.len() {
            return Err(PipelineError::Database(
                "Column list does not match values".to_string(),
            ));
        }

        let mut tables = self.lock()?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| PipelineError::Database(format!("Table '{}' doesn't exist", table)))?;

        if self.unique_dates {
            let date = row_date(values);
            if date.is_some() && rows.iter().any(|row| row_date(row) == date) {
                return Err(PipelineError::Database(format!(
                    "Duplicate entry '{}' for key 'date'",
                    values[0].as_deref().unwrap_or_default()
                )));
            }
        }

        rows.push(values.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str) -> Vec<Option<String>> {
        vec![Some(date.to_string()), None]
    }

    #[tokio::test]
    async fn test_max_date_empty_table() {
        let store = MemoryStore::new();
        store.ensure_table("runs", RunSchema::get()).await.unwrap();
        assert_eq!(store.max_date("runs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_max_date_missing_table() {
        let store = MemoryStore::new();
        assert!(store.max_date("runs").await.is_err());
    }

    #[tokio::test]
    async fn test_unique_dates() {
        let store = MemoryStore::with_unique_dates();
        store.ensure_table("runs", RunSchema::get()).await.unwrap();
        let columns = ["date", "pace"];
        store
            .insert_row("runs", &columns, &row("2024-01-02"))
            .await
            .unwrap();
        let err = store
            .insert_row("runs", &columns, &row("2024-01-02"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate entry"));
        assert_eq!(
            store.max_date("runs").await.unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }
}
