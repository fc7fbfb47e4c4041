// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Export archive discovery and unpacking.
//!
//! Looks for `export*.zip` in the downloads folder, unpacks the newest one,
//! moves the export document into the data folder and removes the archive
//! and the extracted folder. Problems with the archive are reported through
//! [`LocateOutcome`] and never as errors: no new data is a normal outcome.

use serde::Serialize;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{Config, ARCHIVE_PREFIX};

/// Result of looking for a new export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LocateOutcome {
    /// No archive in the downloads folder
    NoArchive,
    /// The export document from `archive` is now at `document`
    Imported { archive: PathBuf, document: PathBuf },
    /// An archive was found but produced no export document
    Failed { archive: PathBuf, reason: String },
}

impl LocateOutcome {
    pub fn is_new_data(&self) -> bool {
        matches!(self, LocateOutcome::Imported { .. })
    }
}

/// Finds and unpacks export archives.
pub struct ArchiveLocator {
    downloads_dir: PathBuf,
    extracted_dir: PathBuf,
    extracted_document: PathBuf,
    raw_document: PathBuf,
}

/// Archive candidate with its modification time.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    modified: SystemTime,
}

impl ArchiveLocator {
    pub fn new(config: &Config) -> Self {
        Self {
            downloads_dir: config.downloads_dir.clone(),
            extracted_dir: config.extracted_dir(),
            extracted_document: config.extracted_document(),
            raw_document: config.raw_document(),
        }
    }

    /// Unpack the newest archive, if any.
    pub fn refresh(&self) -> LocateOutcome {
        let Some(archive) = self.newest_archive() else {
            tracing::debug!(dir = %self.downloads_dir.display(), "No export archive found");
            return LocateOutcome::NoArchive;
        };
        tracing::info!(archive = %archive.display(), "Found export archive");

        match self.import(&archive) {
            Ok(()) => LocateOutcome::Imported {
                archive,
                document: self.raw_document.clone(),
            },
            Err(e) => {
                tracing::warn!(archive = %archive.display(), error = %e, "Export archive not imported");
                // Leave nothing half-extracted behind.
                if let Err(e) = remove_dir_if_exists(&self.extracted_dir) {
                    tracing::warn!(error = %e, "Failed to remove extracted folder");
                }
                LocateOutcome::Failed {
                    archive,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Newest `export*.zip`; equal times go to the largest file name.
    fn newest_archive(&self) -> Option<PathBuf> {
        let entries = match fs::read_dir(&self.downloads_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.downloads_dir.display(), error = %e, "Cannot read downloads folder");
                return None;
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_archive_name(&entry.file_name().to_string_lossy()))
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                Some(Candidate {
                    path: entry.path(),
                    modified: meta.modified().ok()?,
                })
            })
            .max_by(|a, b| {
                a.modified
                    .cmp(&b.modified)
                    .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
            })
            .map(|c| c.path)
    }

    fn import(&self, archive: &Path) -> Result<(), ArchiveError> {
        remove_file_if_exists(&self.raw_document)?;
        self.extract(archive)?;

        if !self.extracted_document.is_file() {
            return Err(ArchiveError::MissingDocument(self.extracted_document.clone()));
        }
        if let Some(parent) = self.raw_document.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&self.extracted_document, &self.raw_document)?;
        tracing::info!(document = %self.raw_document.display(), "Export document moved");

        remove_dir_if_exists(&self.extracted_dir)?;
        fs::remove_file(archive)?;
        Ok(())
    }

    fn extract(&self, archive: &Path) -> Result<(), ArchiveError> {
        let file = File::open(archive)?;
        let mut zip =
            zip::ZipArchive::new(file).map_err(|e| ArchiveError::Zip(e.to_string()))?;
        zip.extract(&self.downloads_dir)
            .map_err(|e| ArchiveError::Zip(e.to_string()))?;
        tracing::debug!(entries = zip.len(), "Archive extracted");
        Ok(())
    }
}

fn is_archive_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(".zip")
}

fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Reasons an archive yields no export document.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid zip archive: {0}")]
    Zip(String),

    #[error("Export document not found at {0}")]
    MissingDocument(PathBuf),
}
