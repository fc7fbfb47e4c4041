// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MySQL-backed run store.

use chrono::NaiveDate;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::validate_identifier;
use crate::db::RunStore;
use crate::error::PipelineError;
use crate::models::RunSchema;

/// MySQL client holding a single connection; the pipeline is the only writer.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Connect to the database named in the URL.
    pub async fn connect(database_url: &str) -> Result<Self, PipelineError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| PipelineError::Database(format!("Failed to connect to MySQL: {}", e)))?;

        tracing::info!("Connected to MySQL");
        Ok(Self { pool })
    }

    /// Close the connection once the run is over.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn checked_table(table: &str) -> Result<&str, PipelineError> {
    validate_identifier(table).map_err(|e| PipelineError::Database(e.to_string()))?;
    Ok(table)
}

/// `INSERT` with one placeholder per column.
pub(crate) fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    )
}

impl RunStore for MySqlStore {
    async fn ensure_table(&self, table: &str, schema: &RunSchema) -> Result<(), PipelineError> {
        let sql = schema.create_table_sql(checked_table(table)?);
        sqlx::query(&sql).execute(&self.pool).await?;
        tracing::debug!(table, "Runs table ready");
        Ok(())
    }

    async fn max_date(&self, table: &str) -> Result<Option<NaiveDate>, PipelineError> {
        let sql = format!("SELECT MAX(date) FROM {}", checked_table(table)?);
        let last: Option<NaiveDate> = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(last)
    }

    async fn insert_row(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Option<String>],
    ) -> Result<(), PipelineError> {
        if columns.len() != values.len() {
            return Err(PipelineError::Database(format!(
                "{} columns but {} values",
                columns.len(),
                values.len()
            )));
        }

        let sql = insert_sql(checked_table(table)?, columns);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value.clone());
        }
        query.execute(&self.pool).await?;
        Ok(())
    }
}
