// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the import pipeline stages.

pub mod archive;
pub mod cleaned_csv;
pub mod enricher;
pub mod extractor;
pub mod loader;
pub mod normalizer;
pub mod pipeline;

pub use archive::{ArchiveLocator, LocateOutcome};
pub use loader::{IncrementalLoader, LoadReport};
pub use normalizer::RowErrorPolicy;
pub use pipeline::{clean_export, CleanSummary, ImportPipeline, ImportReport};
