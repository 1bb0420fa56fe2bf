// ABOUTME: Route module organization for the WODX HTTP endpoints
// ABOUTME: Merges the JSON API, the HTML feed, and health checks into one router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for WODX
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the [`DailyWorkflow`](crate::daily::DailyWorkflow).

use std::sync::Arc;

use axum::Router;

use crate::resources::ServerResources;

/// HTML feed and the generate-today action
pub mod feed;
/// Health check and readiness routes
pub mod health;
/// JSON generation and record routes
pub mod workouts;

/// Feed route handlers
pub use feed::FeedRoutes;
/// Health route handlers
pub use health::HealthRoutes;
/// Generation request payload
pub use workouts::GenerateRequest;
/// Workout API route handlers
pub use workouts::WorkoutRoutes;

/// Every application route, without middleware
#[must_use]
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(WorkoutRoutes::routes(Arc::clone(resources)))
        .merge(FeedRoutes::routes(Arc::clone(resources)))
        .merge(HealthRoutes::routes(Arc::clone(resources)))
}
