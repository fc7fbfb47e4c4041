// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Joins VO2 max samples into the workouts they were recorded during.

use chrono::{DateTime, FixedOffset};

use crate::error::{PipelineError, Result};
use crate::models::run::round2;
use crate::models::{EnrichedWorkout, RawSample, RawWorkout};
use crate::time_utils::parse_export_timestamp;

/// VO2 max samples ordered by creation time.
pub struct SampleIndex {
    samples: Vec<(DateTime<FixedOffset>, f64)>,
}

impl SampleIndex {
    /// Parse and sort the samples once.
    pub fn new(samples: &[RawSample]) -> Result<Self> {
        let mut parsed = samples
            .iter()
            .map(|s| Ok((parse_export_timestamp(&s.creation_date)?, s.value)))
            .collect::<Result<Vec<_>>>()?;
        parsed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { samples: parsed })
    }

    /// Mean of the samples with `start <= created <= end`, rounded to two
    /// digits.
    pub fn mean_between(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Option<f64> {
        let lo = self.samples.partition_point(|(t, _)| *t < start);
        let hi = self.samples.partition_point(|(t, _)| *t <= end);
        if lo >= hi {
            return None;
        }
        let window = &self.samples[lo..hi];
        let sum: f64 = window.iter().map(|(_, v)| v).sum();
        Some(round2(sum / window.len() as f64))
    }
}

fn required_timestamp(workout: &RawWorkout, name: &str) -> Result<DateTime<FixedOffset>> {
    let value = workout
        .attribute(name)
        .ok_or_else(|| PipelineError::Parse(format!("workout without {}", name)))?;
    parse_export_timestamp(value)
}

/// Resolve one workout's fields and attach its VO2 max average.
pub fn enrich_workout(workout: &RawWorkout, samples: &SampleIndex) -> Result<EnrichedWorkout> {
    let start = required_timestamp(workout, "startDate")?;
    let end = required_timestamp(workout, "endDate")?;

    let mut enriched = EnrichedWorkout::new(start);
    enriched.duration = workout.attribute("duration").map(str::to_string);
    for field in &workout.fields {
        enriched.apply(field);
    }
    enriched.vo2_max = samples.mean_between(start, end);
    Ok(enriched)
}

/// Enrich every workout against the same sample set.
pub fn enrich_all(workouts: &[RawWorkout], samples: &[RawSample]) -> Result<Vec<EnrichedWorkout>> {
    let index = SampleIndex::new(samples)?;
    let enriched = workouts
        .iter()
        .map(|w| enrich_workout(w, &index))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        workouts = enriched.len(),
        with_vo2 = enriched.iter().filter(|w| w.vo2_max.is_some()).count(),
        "Enriched workouts"
    );
    Ok(enriched)
}
