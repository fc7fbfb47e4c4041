// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Column layout of the runs table, shared by the cleaner, the CSV
//! artifact and the loader.

/// Semantic type of a run column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Time of day (`HH:MM:SS`)
    Time,
    /// Two-digit decimal
    Decimal,
    /// Two-digit decimal number of minutes
    Minutes,
    /// Whole number
    Integer,
}

/// One column of the runs table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// MySQL column type used when creating the table
    pub sql_type: &'static str,
}

/// Ordered column descriptor for the runs table.
#[derive(Debug)]
pub struct RunSchema {
    identity: Column,
    columns: [Column; 13],
}

const fn column(name: &'static str, kind: ColumnKind, sql_type: &'static str) -> Column {
    Column {
        name,
        kind,
        sql_type,
    }
}

static RUN_SCHEMA: RunSchema = RunSchema {
    identity: column(
        "run_id",
        ColumnKind::Integer,
        "SMALLINT UNSIGNED PRIMARY KEY AUTO_INCREMENT",
    ),
    columns: [
        column("date", ColumnKind::Date, "DATE"),
        column("start_time", ColumnKind::Time, "TIME"),
        column("distance", ColumnKind::Decimal, "DECIMAL(4, 2)"),
        column("duration", ColumnKind::Minutes, "DECIMAL(5, 2)"),
        column("pace", ColumnKind::Minutes, "DECIMAL(4, 2)"),
        column("calories", ColumnKind::Integer, "SMALLINT UNSIGNED"),
        column("vo2_max", ColumnKind::Decimal, "DECIMAL(4, 2)"),
        column("avg_hr", ColumnKind::Integer, "TINYINT UNSIGNED"),
        column("max_hr", ColumnKind::Integer, "TINYINT UNSIGNED"),
        column("min_hr", ColumnKind::Integer, "TINYINT UNSIGNED"),
        column("elevation", ColumnKind::Integer, "SMALLINT UNSIGNED"),
        column("temperature", ColumnKind::Integer, "TINYINT UNSIGNED"),
        column("humidity", ColumnKind::Integer, "TINYINT UNSIGNED"),
    ],
};

impl RunSchema {
    /// The runs table layout.
    pub fn get() -> &'static RunSchema {
        &RUN_SCHEMA
    }

    /// Data columns in table order (identity key excluded).
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Position of a column in the row layout.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the given table name.
    pub fn create_table_sql(&self, table: &str) -> String {
        let definitions: Vec<String> = std::iter::once(&self.identity)
            .chain(self.columns.iter())
            .map(|c| format!("{} {}", c.name, c.sql_type))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table,
            definitions.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order() {
        let names = RunSchema::get().column_names();
        assert_eq!(
            names,
            vec![
                "date",
                "start_time",
                "distance",
                "duration",
                "pace",
                "calories",
                "vo2_max",
                "avg_hr",
                "max_hr",
                "min_hr",
                "elevation",
                "temperature",
                "humidity"
            ]
        );
    }

    #[test]
    fn test_create_table_sql_starts_with_identity() {
        let sql = RunSchema::get().create_table_sql("runs");
        assert!(sql.starts_with(
            "CREATE TABLE IF NOT EXISTS runs (run_id SMALLINT UNSIGNED PRIMARY KEY AUTO_INCREMENT, date DATE"
        ));
        assert!(sql.ends_with("humidity TINYINT UNSIGNED)"));
    }

    #[test]
    fn test_index_of() {
        let schema = RunSchema::get();
        assert_eq!(schema.index_of("date"), Some(0));
        assert_eq!(schema.index_of("humidity"), Some(12));
        assert_eq!(schema.index_of("run_id"), None);
    }
}
