// ABOUTME: One-shot copy of workout records from one store into another
// ABOUTME: Used to move a file-backed collection into the hosted table, record by record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use wodx_core::errors::{AppResult, ErrorCode};

use super::WorkoutStore;

/// Outcome of an import run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportReport {
    /// Records read from the source
    pub total: usize,
    /// Records written to the target
    pub inserted: Vec<NaiveDate>,
    /// Dates the target already held
    pub skipped: Vec<NaiveDate>,
    /// Dates that failed, with the error message
    pub failed: Vec<(NaiveDate, String)>,
}

impl ImportReport {
    /// Whether every record was inserted or already present
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Copy every record of `source` into `target`
///
/// Per-record failures are collected in the report and do not stop the run.
/// With `dry_run`, nothing is written and every record counts as inserted.
///
/// # Errors
///
/// Returns an error only if the source cannot be listed
pub async fn import_records(
    source: &dyn WorkoutStore,
    target: &dyn WorkoutStore,
    dry_run: bool,
) -> AppResult<ImportReport> {
    let records = source.list().await?;
    let mut report = ImportReport {
        total: records.len(),
        ..ImportReport::default()
    };

    info!(
        total = report.total,
        source = source.backend_name(),
        target = target.backend_name(),
        dry_run,
        "Starting import"
    );

    for record in records {
        let date = record.date;
        if dry_run {
            info!(%date, "Would insert workout");
            report.inserted.push(date);
            continue;
        }

        match target.append(record).await {
            Ok(_) => {
                info!(%date, "Inserted workout");
                report.inserted.push(date);
            }
            Err(e) if e.code == ErrorCode::DuplicateDate => {
                info!(%date, "Workout already present, skipping");
                report.skipped.push(date);
            }
            Err(e) => {
                warn!(%date, error = %e.message, "Failed to insert workout");
                report.failed.push((date, e.message));
            }
        }
    }

    Ok(report)
}
