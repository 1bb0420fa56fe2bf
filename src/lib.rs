// ABOUTME: Main library entry point for the WODX daily workout service
// ABOUTME: Generates one workout per day with an LLM coach, stores it, and serves a feed and JSON API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # WODX
//!
//! A workout-of-the-day service. Each day an OpenAI-compatible model is asked
//! for a structured workout that takes the previous seven days into account;
//! the result is stored once per calendar date and shown in a paginated HTML
//! feed alongside a small JSON API.
//!
//! ## Architecture
//!
//! - **Generation**: prompt assembly, model call, and reply validation
//! - **Storage**: file, hosted (`PostgREST`) and `SQLite` backends behind one trait
//! - **Daily workflow**: the single writer, serialized per calendar date
//! - **Routes**: JSON API, HTML feed, and health checks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wodx::config::ServerConfig;
//! use wodx::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let resources = Arc::new(ServerResources::from_config(config).await?);
//!     wodx::server::run(resources, port).await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// Generate-and-persist coordination for today's workout
pub mod daily;

/// Prompt assembly, model call, and reply validation
pub mod generation;

/// Chat-completion provider abstraction and prompt templates
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Shared handler state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Server bootstrap
pub mod server;

/// Workout record stores
pub mod storage;

/// Core models, errors and pagination
pub use wodx_core::{errors, models, pagination};
