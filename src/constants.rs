// ABOUTME: Application constants grouped by domain
// ABOUTME: Environment variable names, service defaults, and model request parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than living next to
//! the code that reads them, so configuration names stay discoverable.

/// Service identity used in logs
pub mod service_names {
    /// Server binary / service name
    pub const WODX_SERVER: &str = "wodx-server";
}

/// Environment variable names
pub mod env_config {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Deployment environment name
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Model provider credential
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// OpenAI-compatible base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Model identifier
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// Prompt profile (`crossfit` or `postpartum`)
    pub const PROMPT_PROFILE: &str = "WOD_PROMPT_PROFILE";
    /// Storage backend (`file`, `hosted`, `sqlite`)
    pub const STORE: &str = "WOD_STORE";
    /// Flat file location for the file backend
    pub const DATA_FILE: &str = "WOD_DATA_FILE";
    /// Database URL for the sqlite backend
    pub const DATABASE_URL: &str = "WOD_DATABASE_URL";
    /// Hosted store base URL
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    /// Hosted store access key
    pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
    /// Hosted table name
    pub const TABLE: &str = "WOD_TABLE";
    /// Feed page size
    pub const PAGE_SIZE: &str = "WOD_PAGE_SIZE";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Default OpenAI-compatible endpoint
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default model identifier
    pub const OPENAI_MODEL: &str = "gpt-4";
    /// Default data file for the file backend
    pub const DATA_FILE: &str = "workouts.json";
    /// Default sqlite database URL
    pub const DATABASE_URL: &str = "sqlite:./data/workouts.db";
    /// Default hosted table name
    pub const TABLE: &str = "workouts";
}

/// Parameters sent with every generation request
pub mod generation {
    /// Elevated randomness for creative variety between days
    pub const TEMPERATURE: f32 = 1.0;
    /// Output length cap
    pub const MAX_TOKENS: u32 = 1500;
}

/// HTTP client and server timeouts
pub mod timeouts {
    /// Connection timeout for outbound calls
    pub const CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Total timeout for one model completion
    pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
    /// Total timeout for one hosted-store call
    pub const STORE_REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Upper bound for a whole inbound request (generation included)
    pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 180;
}

/// Request limits
pub mod limits {
    /// Maximum accepted request body
    pub const MAX_BODY_BYTES: usize = 256 * 1024;
}
