// ABOUTME: Hosted workout store talking to a Supabase/PostgREST table over HTTPS
// ABOUTME: Lists ordered by date, inserts single rows, and checks the date before inserting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Rows may carry a server-assigned `id` column. It is dropped on read and
//! never sent on insert.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;
use wodx_core::errors::{AppError, AppResult};
use wodx_core::models::DailyWorkout;

use super::{sort_by_date, WorkoutStore};
use crate::constants::timeouts;

/// PostgREST error code for a unique constraint violation
const UNIQUE_VIOLATION: &str = "23505";

/// Workout store backed by a hosted PostgREST table
pub struct HostedWorkoutStore {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl HostedWorkoutStore {
    /// Store for `table` under the project at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot carry a path or the HTTP client fails to build
    pub fn new(base_url: &Url, api_key: impl Into<String>, table: &str) -> AppResult<Self> {
        let mut endpoint = base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| AppError::config_invalid(format!("Invalid hosted store URL: {base_url}")))?
            .pop_if_empty()
            .extend(["rest", "v1", table]);

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeouts::STORE_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Table endpoint, e.g. `https://x.supabase.co/rest/v1/workouts`
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> AppResult<Response> {
        self.authorize(request).send().await.map_err(|e| {
            AppError::storage(format!("Failed to {action}: {e}")).with_source(e)
        })
    }

    async fn fetch_rows(&self, url: Url) -> AppResult<Vec<DailyWorkout>> {
        let response = self.send(self.client.get(url), "load workouts").await?;
        let rows: Vec<Value> = read_json(response, "load workouts").await?;

        rows.into_iter().map(row_to_workout).collect()
    }
}

#[async_trait]
impl WorkoutStore for HostedWorkoutStore {
    fn backend_name(&self) -> &'static str {
        "hosted"
    }

    #[instrument(skip(self))]
    async fn list(&self) -> AppResult<Vec<DailyWorkout>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "date.asc");

        let mut records = self.fetch_rows(url).await?;
        sort_by_date(&mut records);
        debug!(count = records.len(), "Listed hosted workouts");
        Ok(records)
    }

    async fn get_by_date(&self, date: NaiveDate) -> AppResult<Option<DailyWorkout>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("date", &format!("eq.{date}"))
            .append_pair("limit", "1");

        Ok(self.fetch_rows(url).await?.into_iter().next())
    }

    #[instrument(skip(self, record), fields(date = %record.date))]
    async fn append(&self, record: DailyWorkout) -> AppResult<DailyWorkout> {
        if self.get_by_date(record.date).await?.is_some() {
            return Err(AppError::duplicate_date(record.date));
        }

        let request = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(&[&record]);
        let response = self.send(request, "store workout").await?;

        if response.status() == StatusCode::CONFLICT {
            let body = response.text().await.map_err(|e| {
                AppError::storage(format!("Failed to store workout: {e}")).with_source(e)
            })?;
            if body.contains(UNIQUE_VIOLATION) || body.contains("duplicate") {
                return Err(AppError::duplicate_date(record.date));
            }
            return Err(AppError::storage(format!(
                "Failed to store workout: {}",
                body.trim()
            )));
        }

        let rows: Vec<Value> = read_json(response, "store workout").await?;
        let stored = match rows.into_iter().next() {
            Some(row) => row_to_workout(row)?,
            None => record,
        };

        info!(date = %stored.date, "Stored workout in hosted table");
        Ok(stored)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response, action: &str) -> AppResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::storage(format!("Failed to {action}: {e}")).with_source(e))?;

    if !status.is_success() {
        return Err(AppError::storage(format!(
            "Failed to {action}: {status} {}",
            body.trim()
        )));
    }

    serde_json::from_str(&body).map_err(|e| {
        AppError::storage(format!("Failed to {action}: unexpected response: {e}")).with_source(e)
    })
}

/// Drop the row `id` and decode the rest as a workout
fn row_to_workout(mut row: Value) -> AppResult<DailyWorkout> {
    if let Some(object) = row.as_object_mut() {
        object.remove("id");
    }
    serde_json::from_value(row)
        .map_err(|e| AppError::storage(format!("Stored row is not a workout: {e}")).with_source(e))
}
