// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, FixedOffset};

use crate::error::{PipelineError, Result};

/// Timestamp layout used throughout the health export, e.g.
/// `2024-01-02 06:15:00 -0400`.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse an export timestamp, keeping the offset it was recorded with.
pub fn parse_export_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value.trim(), EXPORT_TIMESTAMP_FORMAT)
        .map_err(|e| PipelineError::InvalidTimestamp(format!("{:?}: {}", value, e)))
}

/// Format a decimal number of minutes as `H:MM:SS`.
pub fn format_duration(minutes: f64) -> String {
    let total = (minutes * 60.0).round() as i64;
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Format a decimal minutes-per-mile pace as `MM:SS`.
pub fn format_pace(minutes: f64) -> String {
    let total = (minutes * 60.0).round() as i64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
