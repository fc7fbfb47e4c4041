// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Converts enriched workouts into typed run rows.
//!
//! Absent fields stay `None` and are never converted. Runs shorter than
//! [`MIN_DURATION_MINUTES`] are dropped.

use crate::error::{PipelineError, Result};
use crate::models::run::round2;
use crate::models::{CleanRow, EnrichedWorkout};

/// Shortest run kept, compared against the truncated duration.
pub const MIN_DURATION_MINUTES: i64 = 59;

/// Export elevation is in centimetres; this turns it into feet.
const CM_PER_FOOT: f64 = 30.48;

/// What to do with a row that fails conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowErrorPolicy {
    /// Stop the run on the first bad row.
    #[default]
    Abort,
    /// Log the row and leave it out.
    Skip,
}

/// Rows produced by [`normalize_all`].
#[derive(Debug, Default)]
pub struct Normalized {
    pub rows: Vec<CleanRow>,
    /// Runs below the duration floor or without a duration
    pub dropped: usize,
    /// Rows left out under [`RowErrorPolicy::Skip`]
    pub skipped: usize,
}

fn parse_decimal(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PipelineError::Conversion {
            field,
            value: value.to_string(),
        })
}

/// Whole-number fields accept decimal text and truncate.
fn to_integer(field: &'static str, value: Option<&str>) -> Result<Option<i64>> {
    value
        .map(|v| parse_decimal(field, v).map(|n| n.trunc() as i64))
        .transpose()
}

fn to_decimal(field: &'static str, value: Option<&str>) -> Result<Option<f64>> {
    value.map(|v| parse_decimal(field, v).map(round2)).transpose()
}

/// Keep the leading `len` characters of `value`.
fn prefix(value: &str, len: usize) -> &str {
    match value.char_indices().nth(len) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Weather readings keep only their first two characters ("72 degF" -> 72,
/// "6500 %" -> 65, "7.5 degF" -> 7).
fn to_weather(field: &'static str, value: Option<&str>) -> Result<Option<i64>> {
    value
        .map(|v| {
            parse_decimal(field, prefix(v, 2))
                .map(|n| n.trunc() as i64)
                .map_err(|_| PipelineError::Conversion {
                    field,
                    value: v.to_string(),
                })
        })
        .transpose()
}

/// Elevation uses the first four characters of the source value.
fn to_elevation(value: Option<&str>) -> Result<Option<i64>> {
    value
        .map(|v| -> Result<i64> {
            let feet = parse_decimal("elevation", prefix(v, 4)).map_err(|_| {
                PipelineError::Conversion {
                    field: "elevation",
                    value: v.to_string(),
                }
            })? / CM_PER_FOOT;
            Ok(feet.trunc() as i64)
        })
        .transpose()
}

fn pace(duration: f64, distance: Option<f64>) -> Option<f64> {
    distance.filter(|d| *d != 0.0).map(|d| round2(duration / d))
}

/// Convert one workout, or `Ok(None)` if the run is too short to keep.
pub fn normalize(workout: &EnrichedWorkout) -> Result<Option<CleanRow>> {
    let Some(duration) = to_decimal("duration", workout.duration.as_deref())? else {
        tracing::warn!(start = %workout.start, "Dropping workout without duration");
        return Ok(None);
    };
    if (duration.trunc() as i64) < MIN_DURATION_MINUTES {
        tracing::debug!(start = %workout.start, duration, "Dropping short run");
        return Ok(None);
    }

    let distance = to_decimal("distance", workout.distance.as_deref())?;

    Ok(Some(CleanRow {
        date: workout.start.date_naive(),
        start_time: workout.start.time(),
        distance,
        duration,
        pace: pace(duration, distance),
        calories: to_integer("calories", workout.calories.as_deref())?,
        vo2_max: workout.vo2_max.map(round2),
        avg_hr: to_integer("avg_hr", workout.avg_hr.as_deref())?,
        max_hr: to_integer("max_hr", workout.max_hr.as_deref())?,
        min_hr: to_integer("min_hr", workout.min_hr.as_deref())?,
        elevation: to_elevation(workout.elevation.as_deref())?,
        temperature: to_weather("temperature", workout.temperature.as_deref())?,
        humidity: to_weather("humidity", workout.humidity.as_deref())?,
    }))
}

/// Convert every workout under the given error policy.
pub fn normalize_all(workouts: &[EnrichedWorkout], policy: RowErrorPolicy) -> Result<Normalized> {
    let mut out = Normalized::default();
    for workout in workouts {
        match normalize(workout) {
            Ok(Some(row)) => out.rows.push(row),
            Ok(None) => out.dropped += 1,
            Err(e) if e.is_row_error() && policy == RowErrorPolicy::Skip => {
                tracing::warn!(start = %workout.start, error = %e, "Skipping unconvertible run");
                out.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        kept = out.rows.len(),
        dropped = out.dropped,
        skipped = out.skipped,
        "Cleaned runs"
    );
    Ok(out)
}
