// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod run;
pub mod schema;
pub mod workout;

pub use run::{CleanRow, NULL_TOKEN};
pub use schema::{Column, ColumnKind, RunSchema};
pub use workout::{EnrichedWorkout, RawSample, RawWorkout, WorkoutField};
