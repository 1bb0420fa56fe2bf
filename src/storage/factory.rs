// ABOUTME: Storage factory selecting the workout store backend at runtime
// ABOUTME: Builds the file, hosted, or SQLite store from the server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::info;
use wodx_core::errors::AppResult;

use super::{FileWorkoutStore, HostedWorkoutStore, WorkoutStore};
use crate::config::StoreConfig;

/// Open the store described by `config`
///
/// # Errors
///
/// Returns an error if the backend cannot be initialized, or SQLite is
/// selected in a build without the `sqlite` feature
pub async fn open_store(config: &StoreConfig) -> AppResult<Arc<dyn WorkoutStore>> {
    let store: Arc<dyn WorkoutStore> = match config {
        StoreConfig::File { path } => {
            info!(path = %path.display(), "Using file workout store");
            Arc::new(FileWorkoutStore::new(path.clone()))
        }
        StoreConfig::Hosted {
            url,
            api_key,
            table,
        } => {
            info!(url = %url, table = %table, "Using hosted workout store");
            Arc::new(HostedWorkoutStore::new(url, api_key.clone(), table)?)
        }
        StoreConfig::Sqlite { url } => open_sqlite(url).await?,
    };

    Ok(store)
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(url: &str) -> AppResult<Arc<dyn WorkoutStore>> {
    info!(url = %url, "Using sqlite workout store");
    Ok(Arc::new(super::SqliteWorkoutStore::connect(url).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_url: &str) -> AppResult<Arc<dyn WorkoutStore>> {
    Err(wodx_core::errors::AppError::config_invalid(
        "The sqlite store requires building with the `sqlite` feature",
    ))
}
