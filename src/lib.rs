// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Run-Tracker: import running workouts from Apple Health exports
//!
//! This crate turns a Health export archive into cleaned run rows and
//! appends the new ones to a MySQL runs table.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
