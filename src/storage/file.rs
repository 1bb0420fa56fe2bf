// ABOUTME: Flat-file workout store holding the whole collection in one JSON document
// ABOUTME: Serializes read-modify-write appends behind an async mutex
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use wodx_core::errors::{AppError, AppResult};
use wodx_core::models::DailyWorkout;

use super::{sort_by_date, WorkoutStore};

/// Workout store backed by a single pretty-printed JSON array on disk
pub struct FileWorkoutStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileWorkoutStore {
    /// Store at `path`; the file is created on first append
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the JSON document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in file order; a missing or blank file is an empty collection
    async fn read_all(&self) -> AppResult<Vec<DailyWorkout>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                ))
                .with_source(e))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            AppError::storage(format!("Failed to parse {}: {e}", self.path.display()))
                .with_source(e)
        })
    }

    /// Replace the document, via a sibling temp file so readers never see a partial write
    async fn write_all(&self, records: &[DailyWorkout]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::storage(format!("Failed to serialize workouts: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", parent.display()))
                    .with_source(e)
            })?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", tmp.display())).with_source(e)
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::storage(format!("Failed to replace {}: {e}", self.path.display()))
                .with_source(e)
        })
    }
}

#[async_trait]
impl WorkoutStore for FileWorkoutStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn list(&self) -> AppResult<Vec<DailyWorkout>> {
        let mut records = self.read_all().await?;
        sort_by_date(&mut records);
        debug!(count = records.len(), path = %self.path.display(), "Listed workouts");
        Ok(records)
    }

    async fn append(&self, record: DailyWorkout) -> AppResult<DailyWorkout> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.read_all().await?;
        if records.iter().any(|r| r.date == record.date) {
            return Err(AppError::duplicate_date(record.date));
        }

        records.push(record.clone());
        self.write_all(&records).await?;

        info!(date = %record.date, path = %self.path.display(), "Stored workout");
        Ok(record)
    }
}
