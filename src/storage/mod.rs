// ABOUTME: Persistence gateway for daily workout records
// ABOUTME: Defines the WorkoutStore contract implemented by the file, hosted, and SQLite backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Storage
//!
//! Records are create-once, read-many. Every backend keeps `date` unique:
//! appending a second record for a stored date fails with `DUPLICATE_DATE`.
//! An empty or absent store lists as `[]`, never as an error.

/// Runtime backend selection
pub mod factory;
/// Flat JSON file backend
pub mod file;
/// Hosted table backend over the PostgREST API
pub mod hosted;
/// Bulk copy between stores
pub mod import;
/// Embedded SQLite backend
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use factory::open_store;
pub use file::FileWorkoutStore;
pub use hosted::HostedWorkoutStore;
pub use import::{import_records, ImportReport};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWorkoutStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use wodx_core::errors::AppResult;
use wodx_core::models::DailyWorkout;

/// Append/list access to the workout collection
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Backend name for logs
    fn backend_name(&self) -> &'static str;

    /// All records, ascending by date
    async fn list(&self) -> AppResult<Vec<DailyWorkout>>;

    /// Store `record` and return it as stored
    ///
    /// Fails with `DUPLICATE_DATE` if a record for `record.date` exists.
    async fn append(&self, record: DailyWorkout) -> AppResult<DailyWorkout>;

    /// The record for `date`, if any
    async fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyWorkout>> {
        Ok(self.list().await?.into_iter().find(|r| r.date == date))
    }
}

/// Sort ascending by date, keeping insertion order for equal dates
pub(crate) fn sort_by_date(records: &mut [DailyWorkout]) {
    records.sort_by_key(|r| r.date);
}
