// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use run_tracker::config::Config;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Path of the sample export document.
#[allow(dead_code)]
pub const FIXTURE_EXPORT: &str = "tests/fixtures/export.xml";

/// Check if a test MySQL server is configured via environment variable.
#[allow(dead_code)]
pub fn mysql_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if MySQL not available.
#[macro_export]
macro_rules! require_mysql {
    () => {
        if !crate::common::mysql_available() {
            eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Downloads and data folders inside one temporary directory.
#[allow(dead_code)]
pub struct Workspace {
    pub root: TempDir,
    pub config: Config,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create temp dir");
        let downloads = root.path().join("Downloads");
        let data = root.path().join("CleaningData");
        std::fs::create_dir_all(&downloads).expect("Failed to create downloads dir");
        let config = Config::with_dirs(downloads, data);
        Self { root, config }
    }

    pub fn downloads(&self) -> &Path {
        &self.config.downloads_dir
    }

    /// Write an export archive holding `xml` at the usual nested path.
    pub fn add_archive(&self, name: &str, xml: &str) -> PathBuf {
        let entry = format!("{}/export.xml", self.config.extracted_folder);
        self.add_archive_entries(name, &[(entry.as_str(), xml)])
    }

    /// Write an archive with arbitrary entries.
    pub fn add_archive_entries(&self, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.downloads().join(name);
        let file = File::create(&path).expect("Failed to create archive");
        let mut zip = zip::ZipWriter::new(file);
        for (entry, contents) in entries {
            zip.start_file(*entry, SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            zip.write_all(contents.as_bytes())
                .expect("Failed to write zip entry");
        }
        zip.finish().expect("Failed to finish archive");
        path
    }
}

/// The sample export document.
#[allow(dead_code)]
pub fn fixture_xml() -> String {
    std::fs::read_to_string(FIXTURE_EXPORT).expect("Failed to read fixture - is tests/fixtures committed?")
}
