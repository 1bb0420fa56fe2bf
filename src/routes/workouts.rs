// ABOUTME: JSON route handlers for workout generation and the record collection
// ABOUTME: POST /generate returns an unsaved workout; GET/POST /records list and store records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout API routes
//!
//! `/api/generate-workout` and `/api/workouts` are kept as aliases of
//! `/generate` and `/records`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use wodx_core::errors::AppError;
use wodx_core::models::DailyWorkout;

use crate::resources::ServerResources;

/// Body of a generation request
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Recent records, oldest first, at most seven; kept as sent for the prompt
    #[serde(default)]
    pub history: Vec<Value>,
}

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/generate", post(Self::handle_generate))
            .route("/api/generate-workout", post(Self::handle_generate))
            .route(
                "/records",
                get(Self::handle_list_records).post(Self::handle_create_record),
            )
            .route(
                "/api/workouts",
                get(Self::handle_list_records).post(Self::handle_create_record),
            )
            .with_state(resources)
    }

    /// Generate a workout from the supplied history without storing it
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<GenerateRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(request) = body.map_err(rejection_to_error)?;
        info!(history_len = request.history.len(), "Generate request");

        let workout = resources.workflow.preview(&request.history).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// List every record, ascending by date
    async fn handle_list_records(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let records = resources.workflow.records().await?;
        Ok((StatusCode::OK, Json(records)).into_response())
    }

    /// Store one record
    async fn handle_create_record(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<DailyWorkout>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(record) = body.map_err(rejection_to_error)?;
        let stored = resources.workflow.save(record).await?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::invalid_input(rejection.body_text())
}
