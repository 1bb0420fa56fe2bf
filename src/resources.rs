// ABOUTME: Shared server resources injected into every route handler
// ABOUTME: Bundles configuration with the daily workflow and its store and generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use wodx_core::errors::AppResult;

use crate::config::ServerConfig;
use crate::daily::DailyWorkflow;
use crate::generation::WorkoutGenerator;
use crate::storage::{open_store, WorkoutStore};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Generate-and-persist coordinator, the only writer of records
    pub workflow: Arc<DailyWorkflow>,
}

impl ServerResources {
    /// Assemble resources from already-built parts
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        store: Arc<dyn WorkoutStore>,
        generator: WorkoutGenerator,
    ) -> Self {
        Self {
            config,
            workflow: Arc::new(DailyWorkflow::new(store, generator)),
        }
    }

    /// Build resources with a custom workflow (tests pin the clock this way)
    #[must_use]
    pub fn with_workflow(config: Arc<ServerConfig>, workflow: DailyWorkflow) -> Self {
        Self {
            config,
            workflow: Arc::new(workflow),
        }
    }

    /// Open the configured store and model client
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the HTTP client fails to build
    pub async fn from_config(config: ServerConfig) -> AppResult<Self> {
        let store = open_store(&config.store).await?;
        let generator = WorkoutGenerator::from_config(&config.llm)?;
        Ok(Self::new(Arc::new(config), store, generator))
    }

    /// Feed page size
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }
}
