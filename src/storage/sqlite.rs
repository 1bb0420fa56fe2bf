// ABOUTME: SQLite workout store using sqlx with a unique date column
// ABOUTME: Stores each record as JSON next to its date and type for ordering and filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::info;
use wodx_core::errors::{AppError, AppResult};
use wodx_core::models::DailyWorkout;

use super::WorkoutStore;

/// Workout store backed by an embedded SQLite database
#[derive(Clone)]
pub struct SqliteWorkoutStore {
    pool: SqlitePool,
}

impl SqliteWorkoutStore {
    /// Connect to `database_url`, creating the database file and schema as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened or migrated
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config_invalid(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        if !in_memory {
            if let Some(parent) = options
                .get_filename()
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::storage(format!("Failed to create {}: {e}", parent.display()))
                        .with_source(e)
                })?;
            }
        }

        // Each in-memory connection is its own database
        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::storage(format!("Failed to open database: {e}")).with_source(e)
            })?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the workouts table
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                date TEXT PRIMARY KEY,
                type TEXT NOT NULL,
                record TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to migrate database: {e}")))?;

        Ok(())
    }

    fn decode(record: &str) -> AppResult<DailyWorkout> {
        serde_json::from_str(record)
            .map_err(|e| AppError::storage(format!("Stored row is not a workout: {e}")))
    }
}

#[async_trait]
impl WorkoutStore for SqliteWorkoutStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn list(&self) -> AppResult<Vec<DailyWorkout>> {
        let rows = sqlx::query("SELECT record FROM workouts ORDER BY date ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to list workouts: {e}")))?;

        rows.iter()
            .map(|row| Self::decode(&row.get::<String, _>("record")))
            .collect()
    }

    async fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyWorkout>> {
        let row = sqlx::query("SELECT record FROM workouts WHERE date = $1")
            .bind(date.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to load workout: {e}")))?;

        row.map(|r| Self::decode(&r.get::<String, _>("record")))
            .transpose()
    }

    async fn append(&self, record: DailyWorkout) -> AppResult<DailyWorkout> {
        let json = serde_json::to_string(&record)
            .map_err(|e| AppError::storage(format!("Failed to serialize workout: {e}")))?;

        sqlx::query("INSERT INTO workouts (date, type, record) VALUES ($1, $2, $3)")
            .bind(record.date.to_string())
            .bind(record.kind.as_str())
            .bind(json)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::duplicate_date(record.date)
                }
                _ => AppError::storage(format!("Failed to store workout: {e}")),
            })?;

        info!(date = %record.date, "Stored workout in sqlite");
        Ok(record)
    }
}
