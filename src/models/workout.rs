// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout and sample records pulled out of a health export.

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// Activity type of the workouts we track.
pub const RUNNING_ACTIVITY: &str = "HKWorkoutActivityTypeRunning";
/// Record type carrying VO2 max (oxygen uptake) readings.
pub const VO2_MAX_TYPE: &str = "HKQuantityTypeIdentifierVO2Max";

const HEART_RATE_TYPE: &str = "HKQuantityTypeIdentifierHeartRate";
const ACTIVE_ENERGY_TYPE: &str = "HKQuantityTypeIdentifierActiveEnergyBurned";
const DISTANCE_TYPE: &str = "HKQuantityTypeIdentifierDistanceWalkingRunning";

const ELEVATION_KEY: &str = "HKElevationAscended";
const HUMIDITY_KEY: &str = "HKWeatherHumidity";
const TEMPERATURE_KEY: &str = "HKWeatherTemperature";

/// Child of a workout node carrying a `type` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataField {
    HeartRate {
        minimum: Option<String>,
        average: Option<String>,
        maximum: Option<String>,
    },
    /// Active energy burned (`sum`, kcal)
    Calories(String),
    /// Distance walking/running (`sum`, miles)
    Distance(String),
}

/// Child of a workout node carrying a `key` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticKind {
    ElevationAscended,
    WeatherHumidity,
    WeatherTemperature,
}

/// A recognised workout child, resolved at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkoutField {
    Metadata(MetadataField),
    Statistic(StatisticKind, String),
}

impl WorkoutField {
    /// Resolve a `type`-keyed child from its attributes.
    ///
    /// Returns `None` for types we don't track.
    pub fn from_metadata(attrs: &HashMap<String, String>) -> Option<Self> {
        let kind = attrs.get("type")?;
        let field = match kind.as_str() {
            HEART_RATE_TYPE => MetadataField::HeartRate {
                minimum: attrs.get("minimum").cloned(),
                average: attrs.get("average").cloned(),
                maximum: attrs.get("maximum").cloned(),
            },
            ACTIVE_ENERGY_TYPE => MetadataField::Calories(attrs.get("sum")?.clone()),
            DISTANCE_TYPE => MetadataField::Distance(attrs.get("sum")?.clone()),
            _ => return None,
        };
        Some(WorkoutField::Metadata(field))
    }

    /// Resolve a `key`-keyed child from its attributes.
    pub fn from_statistic(attrs: &HashMap<String, String>) -> Option<Self> {
        let kind = match attrs.get("key")?.as_str() {
            ELEVATION_KEY => StatisticKind::ElevationAscended,
            HUMIDITY_KEY => StatisticKind::WeatherHumidity,
            TEMPERATURE_KEY => StatisticKind::WeatherTemperature,
            _ => return None,
        };
        let value = attrs.get("value")?.clone();
        Some(WorkoutField::Statistic(kind, value))
    }
}

/// A running workout as found in the export, before enrichment.
#[derive(Debug, Clone, Default)]
pub struct RawWorkout {
    /// Attributes of the `Workout` node itself
    pub attributes: HashMap<String, String>,
    /// Recognised children, in document order
    pub fields: Vec<WorkoutField>,
}

impl RawWorkout {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One VO2 max reading.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub value: f64,
    /// `creationDate` in export timestamp format
    pub creation_date: String,
}

/// A running workout with every field the cleaner needs, still as raw
/// export strings apart from the parsed start and VO2 average.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedWorkout {
    pub start: DateTime<FixedOffset>,
    /// Duration in minutes
    pub duration: Option<String>,
    pub distance: Option<String>,
    pub calories: Option<String>,
    pub avg_hr: Option<String>,
    pub max_hr: Option<String>,
    pub min_hr: Option<String>,
    pub elevation: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    /// Mean of the VO2 max samples recorded during the workout
    pub vo2_max: Option<f64>,
}

impl EnrichedWorkout {
    /// Build from a raw workout's start, with every optional field unset.
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            duration: None,
            distance: None,
            calories: None,
            avg_hr: None,
            max_hr: None,
            min_hr: None,
            elevation: None,
            temperature: None,
            humidity: None,
            vo2_max: None,
        }
    }

    /// Copy a resolved workout child into the matching field. Later
    /// children overwrite earlier ones.
    pub fn apply(&mut self, field: &WorkoutField) {
        match field {
            WorkoutField::Metadata(MetadataField::HeartRate {
                minimum,
                average,
                maximum,
            }) => {
                self.min_hr = minimum.clone();
                self.avg_hr = average.clone();
                self.max_hr = maximum.clone();
            }
            WorkoutField::Metadata(MetadataField::Calories(v)) => self.calories = Some(v.clone()),
            WorkoutField::Metadata(MetadataField::Distance(v)) => self.distance = Some(v.clone()),
            WorkoutField::Statistic(StatisticKind::ElevationAscended, v) => {
                self.elevation = Some(v.clone())
            }
            WorkoutField::Statistic(StatisticKind::WeatherHumidity, v) => {
                self.humidity = Some(v.clone())
            }
            WorkoutField::Statistic(StatisticKind::WeatherTemperature, v) => {
                self.temperature = Some(v.clone())
            }
        }
    }
}
