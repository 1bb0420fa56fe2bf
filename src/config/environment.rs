// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads port, model credential, prompt profile, and storage backend from the process environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! The process environment is the only configuration source. A missing model
//! credential is not fatal at startup: generation requests fail with
//! `CONFIG_MISSING` instead, so the feed stays readable.

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use wodx_core::pagination::DEFAULT_PAGE_SIZE;

use crate::constants::{defaults, env_config};
use crate::llm::prompts::PromptProfile;

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Model provider settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider credential; generation is unavailable without it
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Prompt constraints and persona
    pub profile: PromptProfile,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("profile", &self.profile)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::OPENAI_BASE_URL.to_owned(),
            model: defaults::OPENAI_MODEL.to_owned(),
            profile: PromptProfile::default(),
        }
    }
}

/// Backing store selection
#[derive(Clone)]
pub enum StoreConfig {
    /// Single JSON document on local disk
    File {
        /// Path of the JSON document
        path: PathBuf,
    },
    /// Hosted table behind a PostgREST API (Supabase)
    Hosted {
        /// Project base URL
        url: Url,
        /// Access key sent as `apikey` and bearer token
        api_key: String,
        /// Table name
        table: String,
    },
    /// Embedded SQLite database
    Sqlite {
        /// sqlx connection URL
        url: String,
    },
}

impl StoreConfig {
    /// Short backend name for logs
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Hosted { .. } => "hosted",
            Self::Sqlite { .. } => "sqlite",
        }
    }

    /// Read the hosted-store settings, failing when either credential is absent
    ///
    /// # Errors
    ///
    /// Returns an error if `SUPABASE_URL` or `SUPABASE_ANON_KEY` is missing or the URL is invalid
    pub fn hosted_from_env() -> Result<Self> {
        let url = env::var(env_config::SUPABASE_URL)
            .ok()
            .filter(|v| !v.is_empty());
        let api_key = env::var(env_config::SUPABASE_ANON_KEY)
            .ok()
            .filter(|v| !v.is_empty());
        let (Some(url), Some(api_key)) = (url, api_key) else {
            bail!(
                "Missing hosted store credentials: set {} and {}",
                env_config::SUPABASE_URL,
                env_config::SUPABASE_ANON_KEY
            );
        };

        Ok(Self::Hosted {
            url: Url::parse(&url)
                .with_context(|| format!("Invalid {} value", env_config::SUPABASE_URL))?,
            api_key,
            table: env_var_or(env_config::TABLE, defaults::TABLE),
        })
    }

    fn from_env() -> Result<Self> {
        match env_var_or(env_config::STORE, "file").to_lowercase().as_str() {
            "file" => Ok(Self::File {
                path: PathBuf::from(env_var_or(env_config::DATA_FILE, defaults::DATA_FILE)),
            }),
            "hosted" | "supabase" => Self::hosted_from_env(),
            "sqlite" => Ok(Self::Sqlite {
                url: env_var_or(env_config::DATABASE_URL, defaults::DATABASE_URL),
            }),
            other => bail!(
                "Invalid {} value '{other}': expected file, hosted, or sqlite",
                env_config::STORE
            ),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => f.debug_struct("File").field("path", path).finish(),
            Self::Hosted { url, table, .. } => f
                .debug_struct("Hosted")
                .field("url", &url.as_str())
                .field("api_key", &"[REDACTED]")
                .field("table", table)
                .finish(),
            Self::Sqlite { url } => f.debug_struct("Sqlite").field("url", url).finish(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Model provider settings
    pub llm: LlmConfig,
    /// Backing store selection
    pub store: StoreConfig,
    /// Records per feed page
    pub page_size: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable has an invalid value, or the
    /// hosted store is selected without its credentials
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: env_var_or(env_config::HTTP_PORT, &defaults::HTTP_PORT.to_string())
                .parse()
                .with_context(|| format!("Invalid {} value", env_config::HTTP_PORT))?,
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
            llm: LlmConfig {
                api_key: env::var(env_config::OPENAI_API_KEY)
                    .ok()
                    .filter(|k| !k.is_empty()),
                base_url: env_var_or(env_config::OPENAI_BASE_URL, defaults::OPENAI_BASE_URL),
                model: env_var_or(env_config::OPENAI_MODEL, defaults::OPENAI_MODEL),
                profile: PromptProfile::parse(&env_var_or(env_config::PROMPT_PROFILE, "crossfit"))
                    .with_context(|| format!("Invalid {} value", env_config::PROMPT_PROFILE))?,
            },
            store: StoreConfig::from_env()?,
            page_size: env_var_or(env_config::PAGE_SIZE, &DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .with_context(|| format!("Invalid {} value", env_config::PAGE_SIZE))?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the page size is zero or the model base URL is not a URL
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("{} must be at least 1", env_config::PAGE_SIZE);
        }

        Url::parse(&self.llm.base_url)
            .with_context(|| format!("Invalid {} value", env_config::OPENAI_BASE_URL))?;

        if self.llm.api_key.is_none() {
            warn!(
                "{} is not set; workout generation will fail until it is configured",
                env_config::OPENAI_API_KEY
            );
        }

        Ok(())
    }

    /// Multi-line summary safe for logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "WODX Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Model: {} via {}\n\
             - Model Credential: {}\n\
             - Prompt Profile: {}\n\
             - Store: {}\n\
             - Page Size: {}",
            self.http_port,
            self.environment,
            self.llm.model,
            self.llm.base_url,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Missing"
            },
            self.llm.profile,
            self.store.backend_name(),
            self.page_size,
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
