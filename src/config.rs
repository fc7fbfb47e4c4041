//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local setups.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_TABLE: &str = "runs";
const DEFAULT_DATA_DIR: &str = "CleaningData";
const DEFAULT_EXTRACTED_FOLDER: &str = "apple_health_export";

/// Name prefix of export archives in the downloads folder.
pub const ARCHIVE_PREFIX: &str = "export";
/// Name of the export document inside the extracted folder and in the data dir.
pub const EXPORT_DOCUMENT: &str = "export.xml";
/// Name of the cleaned CSV in the data dir.
pub const CLEANED_CSV: &str = "cleaned_data.csv";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// MySQL connection URL
    pub database_url: String,
    /// Runs table name
    pub table: String,
    /// Folder watched for export archives
    pub downloads_dir: PathBuf,
    /// Folder holding the raw export document and the cleaned CSV
    pub data_dir: PathBuf,
    /// Folder name the archive extracts into
    pub extracted_folder: String,
    /// Drop rows that fail conversion instead of aborting the run
    pub skip_invalid_rows: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            database_url: "mysql://localhost/running".to_string(),
            table: DEFAULT_TABLE.to_string(),
            downloads_dir: PathBuf::from("Downloads"),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            extracted_folder: DEFAULT_EXTRACTED_FOLDER.to_string(),
            skip_invalid_rows: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let table = env::var("RUN_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string());
        validate_identifier(&table)?;

        let downloads_dir = env::var("DOWNLOADS_DIR")
            .map(PathBuf::from)
            .ok()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("Downloads"));

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            table,
            downloads_dir,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            extracted_folder: env::var("EXTRACTED_FOLDER")
                .unwrap_or_else(|_| DEFAULT_EXTRACTED_FOLDER.to_string()),
            skip_invalid_rows: match env::var("SKIP_INVALID_ROWS") {
                Ok(v) => parse_flag("SKIP_INVALID_ROWS", &v)?,
                Err(_) => false,
            },
        })
    }

    /// Config rooted at the given folders, for tests and tools.
    pub fn with_dirs(downloads_dir: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            downloads_dir: downloads_dir.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Where the extracted export document is moved to.
    pub fn raw_document(&self) -> PathBuf {
        self.data_dir.join(EXPORT_DOCUMENT)
    }

    /// Where the cleaned CSV is written.
    pub fn cleaned_csv(&self) -> PathBuf {
        self.data_dir.join(CLEANED_CSV)
    }

    /// Folder the archive is extracted into.
    pub fn extracted_dir(&self) -> PathBuf {
        self.downloads_dir.join(&self.extracted_folder)
    }

    /// Path of the export document inside the extracted folder.
    pub fn extracted_document(&self) -> PathBuf {
        self.extracted_dir().join(EXPORT_DOCUMENT)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
pub fn validate_identifier(name: &str) -> Result<(), ConfigError> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: "RUN_TABLE",
            value: name.to_string(),
        })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
