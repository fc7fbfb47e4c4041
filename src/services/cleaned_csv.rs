// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The cleaned CSV handed from the cleaner to the loader.
//!
//! Header is the runs table column order; absent values are written as
//! `NULL`.

use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::models::{CleanRow, RunSchema, NULL_TOKEN};

/// Write rows to `path`, replacing any previous file.
pub fn write_rows<P: AsRef<Path>>(path: P, rows: &[CleanRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(RunSchema::get().column_names())?;
    for row in rows {
        writer.write_record(
            row.to_cells()
                .into_iter()
                .map(|cell| cell.unwrap_or_else(|| NULL_TOKEN.to_string())),
        )?;
    }
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote cleaned CSV");
    Ok(())
}

/// Read rows back, checking the header against the runs table layout.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<CleanRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let expected = RunSchema::get().column_names();
    if header != expected {
        return Err(PipelineError::Csv(format!(
            "unexpected header in {}: {}",
            path.display(),
            header.join(",")
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<&str> = record.iter().collect();
        rows.push(CleanRow::from_cells(&cells)?);
    }
    Ok(rows)
}
