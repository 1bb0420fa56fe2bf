// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server, model, and storage configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the WODX server
//!
//! - **Environment**: server, model provider, and store settings read from
//!   environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{Environment, LlmConfig, ServerConfig, StoreConfig};
