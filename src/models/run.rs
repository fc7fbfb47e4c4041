// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cleaned run record, one per running session.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{PipelineError, Result};
use crate::models::schema::{ColumnKind, RunSchema};

/// Token written to the CSV (and sent to MySQL unquoted) for absent values.
pub const NULL_TOKEN: &str = "NULL";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// A cleaned running session, in runs table column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRow {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Miles
    pub distance: Option<f64>,
    /// Minutes
    pub duration: f64,
    /// Minutes per mile
    pub pace: Option<f64>,
    pub calories: Option<i64>,
    pub vo2_max: Option<f64>,
    pub avg_hr: Option<i64>,
    pub max_hr: Option<i64>,
    pub min_hr: Option<i64>,
    /// Feet
    pub elevation: Option<i64>,
    pub temperature: Option<i64>,
    pub humidity: Option<i64>,
}

/// Round to two fractional digits, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn decimal_cell(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{:.2}", v))
}

fn integer_cell(value: Option<i64>) -> Option<String> {
    value.map(|v| v.to_string())
}

impl CleanRow {
    /// Text of one column, `None` when absent or not a run column.
    fn cell(&self, name: &str) -> Option<String> {
        match name {
            "date" => Some(self.date.format(DATE_FORMAT).to_string()),
            "start_time" => Some(self.start_time.format(TIME_FORMAT).to_string()),
            "distance" => decimal_cell(self.distance),
            "duration" => decimal_cell(Some(self.duration)),
            "pace" => decimal_cell(self.pace),
            "calories" => integer_cell(self.calories),
            "vo2_max" => decimal_cell(self.vo2_max),
            "avg_hr" => integer_cell(self.avg_hr),
            "max_hr" => integer_cell(self.max_hr),
            "min_hr" => integer_cell(self.min_hr),
            "elevation" => integer_cell(self.elevation),
            "temperature" => integer_cell(self.temperature),
            "humidity" => integer_cell(self.humidity),
            _ => None,
        }
    }

    /// Serialize to text cells in schema order; `None` means absent.
    pub fn to_cells(&self) -> Vec<Option<String>> {
        RunSchema::get()
            .columns()
            .iter()
            .map(|column| self.cell(column.name))
            .collect()
    }

    /// Parse a row of CSV cells laid out in schema order.
    pub fn from_cells(cells: &[&str]) -> Result<Self> {
        let schema = RunSchema::get();
        if cells.len() != schema.columns().len() {
            return Err(PipelineError::Csv(format!(
                "expected {} cells, found {}",
                schema.columns().len(),
                cells.len()
            )));
        }

        let mut values = schema
            .columns()
            .iter()
            .zip(cells)
            .map(|(column, cell)| CellValue::parse(column.name, column.kind, cell))
            .collect::<Result<Vec<_>>>()?;

        let mut take = |name: &str| {
            schema
                .index_of(name)
                .map(|idx| std::mem::replace(&mut values[idx], CellValue::Null))
                .unwrap_or(CellValue::Null)
        };

        Ok(Self {
            date: take("date").into_date("date")?,
            start_time: take("start_time").into_time("start_time")?,
            distance: take("distance").into_decimal(),
            duration: take("duration")
                .into_decimal()
                .ok_or_else(|| PipelineError::Csv("duration is NULL".to_string()))?,
            pace: take("pace").into_decimal(),
            calories: take("calories").into_integer(),
            vo2_max: take("vo2_max").into_decimal(),
            avg_hr: take("avg_hr").into_integer(),
            max_hr: take("max_hr").into_integer(),
            min_hr: take("min_hr").into_integer(),
            elevation: take("elevation").into_integer(),
            temperature: take("temperature").into_integer(),
            humidity: take("humidity").into_integer(),
        })
    }
}

/// One parsed CSV cell.
enum CellValue {
    Null,
    Date(NaiveDate),
    Time(NaiveTime),
    Decimal(f64),
    Integer(i64),
}

impl CellValue {
    fn parse(name: &str, kind: ColumnKind, cell: &str) -> Result<Self> {
        let cell = cell.trim();
        if cell == NULL_TOKEN || cell.is_empty() {
            return Ok(CellValue::Null);
        }
        let invalid = || PipelineError::Csv(format!("invalid {} value {:?}", name, cell));
        Ok(match kind {
            ColumnKind::Date => {
                CellValue::Date(NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|_| invalid())?)
            }
            ColumnKind::Time => {
                CellValue::Time(NaiveTime::parse_from_str(cell, TIME_FORMAT).map_err(|_| invalid())?)
            }
            ColumnKind::Decimal | ColumnKind::Minutes => {
                CellValue::Decimal(cell.parse().map_err(|_| invalid())?)
            }
            ColumnKind::Integer => CellValue::Integer(cell.parse().map_err(|_| invalid())?),
        })
    }

    fn into_date(self, name: &str) -> Result<NaiveDate> {
        match self {
            CellValue::Date(d) => Ok(d),
            _ => Err(PipelineError::Csv(format!("{} is NULL", name))),
        }
    }

    fn into_time(self, name: &str) -> Result<NaiveTime> {
        match self {
            CellValue::Time(t) => Ok(t),
            _ => Err(PipelineError::Csv(format!("{} is NULL", name))),
        }
    }

    fn into_decimal(self) -> Option<f64> {
        match self {
            CellValue::Decimal(v) => Some(v),
            _ => None,
        }
    }

    fn into_integer(self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> CleanRow {
        CleanRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(6, 15, 0).unwrap(),
            distance: Some(8.0),
            duration: 65.0,
            pace: Some(8.13),
            calories: Some(812),
            vo2_max: None,
            avg_hr: Some(140),
            max_hr: Some(170),
            min_hr: Some(100),
            elevation: Some(32),
            temperature: Some(72),
            humidity: None,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.125), 8.13);
        assert_eq!(round2(45.6), 45.6);
        assert_eq!(round2(58.904), 58.9);
    }

    #[test]
    fn test_to_cells_formats_and_nulls() {
        let cells = sample_row().to_cells();
        assert_eq!(cells.len(), RunSchema::get().columns().len());
        assert_eq!(cells[0].as_deref(), Some("2024-01-02"));
        assert_eq!(cells[1].as_deref(), Some("06:15:00"));
        assert_eq!(cells[2].as_deref(), Some("8.00"));
        assert_eq!(cells[4].as_deref(), Some("8.13"));
        assert_eq!(cells[6], None);
        assert_eq!(cells[12], None);
    }

    #[test]
    fn test_cells_follow_schema_positions() {
        let schema = RunSchema::get();
        let mut row = sample_row();
        row.vo2_max = Some(45.6);
        row.humidity = Some(82);
        let cells = row.to_cells();

        // Every column is populated, so each one maps to a field.
        assert!(cells.iter().all(Option::is_some));
        let at = |name: &str| cells[schema.index_of(name).unwrap()].as_deref();
        assert_eq!(at("date"), Some("2024-01-02"));
        assert_eq!(at("duration"), Some("65.00"));
        assert_eq!(at("calories"), Some("812"));
        assert_eq!(at("vo2_max"), Some("45.60"));
        assert_eq!(at("min_hr"), Some("100"));
        assert_eq!(at("elevation"), Some("32"));
        assert_eq!(at("humidity"), Some("82"));
    }

    #[test]
    fn test_from_cells_reads_null_token() {
        let row = sample_row();
        let cells: Vec<String> = row
            .to_cells()
            .into_iter()
            .map(|c| c.unwrap_or_else(|| NULL_TOKEN.to_string()))
            .collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        assert_eq!(CleanRow::from_cells(&refs).unwrap(), row);
    }

    #[test]
    fn test_from_cells_rejects_wrong_width() {
        let err = CleanRow::from_cells(&["2024-01-02", "06:15:00"]).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_from_cells_rejects_bad_integer() {
        let mut cells = vec!["NULL"; 13];
        cells[0] = "2024-01-02";
        cells[1] = "06:15:00";
        cells[3] = "65.00";
        cells[5] = "lots";
        let err = CleanRow::from_cells(&cells).unwrap_err();
        assert!(err.to_string().contains("calories"));
    }
}
