// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging, fixed dates, workout fixtures, and server resource builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `wodx`

use std::path::Path;
use std::sync::{Arc, Once};

use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use wodx::{
    config::{Environment, LlmConfig, ServerConfig, StoreConfig},
    daily::DailyWorkflow,
    generation::WorkoutGenerator,
    llm::prompts::PromptProfile,
    models::DailyWorkout,
    resources::ServerResources,
    server,
    storage::{FileWorkoutStore, WorkoutStore},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; tests stay quiet by default
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// The date every test treats as "today"
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// `today` shifted by `days` (negative goes back)
pub fn day_offset(days: i64) -> NaiveDate {
    today() + chrono::Duration::days(days)
}

/// A complete workout record for `date`
pub fn workout_on(date: NaiveDate) -> DailyWorkout {
    DailyWorkout::schema_example().dated(date)
}

/// A valid model reply body, dated wrongly on purpose
pub fn generated_workout_json() -> Value {
    json!({
        "date": "1999-01-01",
        "type": "workout",
        "warmup": {
            "title": "Warm-up",
            "description": "Row and mobilize",
            "duration": 10,
            "exercises": ["500m row", "Air squats"]
        },
        "preWorkout": {
            "title": "Skill",
            "description": "Kipping drills",
            "duration": 10,
            "exercises": ["Kip swings"]
        },
        "mainWorkout": {
            "title": "Fran",
            "description": "21-15-9 for time",
            "duration": 15,
            "exercises": ["Thrusters", "Pull-ups"]
        },
        "cooldown": {
            "title": "Cool-down",
            "description": "Easy bike and stretch",
            "duration": 10,
            "exercises": ["Bike", "Couch stretch"]
        },
        "notes": "Scale the thrusters as needed."
    })
}

/// Model settings pointing at `base_url`, with or without a credential
pub fn llm_config(base_url: &str, with_key: bool) -> LlmConfig {
    LlmConfig {
        api_key: with_key.then(|| "sk-test".to_owned()),
        base_url: base_url.to_owned(),
        ..LlmConfig::default()
    }
}

/// Server configuration over a file store in `dir`
pub fn server_config(dir: &Path, llm: LlmConfig) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        llm,
        store: StoreConfig::File {
            path: dir.join("workouts.json"),
        },
        page_size: 1,
    }
}

/// Resources with a pinned clock over the given store
pub fn resources_with_store(
    config: ServerConfig,
    store: Arc<dyn WorkoutStore>,
) -> Arc<ServerResources> {
    init_test_logging();
    let generator = WorkoutGenerator::from_config(&config.llm).unwrap();
    let workflow = DailyWorkflow::with_clock(store, generator, Arc::new(today));
    Arc::new(ServerResources::with_workflow(Arc::new(config), workflow))
}

/// Resources over a file store in `dir`
pub fn file_resources(dir: &Path, llm: LlmConfig) -> Arc<ServerResources> {
    let store = Arc::new(FileWorkoutStore::new(dir.join("workouts.json")));
    resources_with_store(server_config(dir, llm), store)
}

/// Resources whose generator has no credential
pub fn offline_resources(dir: &Path) -> Arc<ServerResources> {
    let llm = LlmConfig {
        profile: PromptProfile::Crossfit,
        ..LlmConfig::default()
    };
    file_resources(dir, llm)
}

/// Full application router with middleware
pub fn app(resources: &Arc<ServerResources>) -> Router {
    server::build_router(resources)
}
