//! Database layer.
//!
//! The loader only talks to a [`RunStore`]; `MySqlStore` is the real
//! backend and `MemoryStore` serves offline runs and tests.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use chrono::NaiveDate;
use std::future::Future;

use crate::error::PipelineError;
use crate::models::RunSchema;

/// Destination table for cleaned runs.
pub trait RunStore {
    /// Create the runs table if it does not exist yet.
    fn ensure_table(
        &self,
        table: &str,
        schema: &RunSchema,
    ) -> impl Future<Output = Result<(), PipelineError>> + Send;

    /// Latest run date in the table, `None` when the table is empty.
    fn max_date(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Option<NaiveDate>, PipelineError>> + Send;

    /// Insert one row. `None` values are stored as SQL NULL. Each call is
    /// committed on its own.
    fn insert_row(
        &self,
        table: &str,
        columns: &[&str],
        values: &[Option<String>],
    ) -> impl Future<Output = Result<(), PipelineError>> + Send;
}
