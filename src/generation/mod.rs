// ABOUTME: Workout generation service turning recent history into one new DailyWorkout
// ABOUTME: Renders the prompt, calls the model, then parses and validates its JSON reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Generation
//!
//! [`WorkoutGenerator::generate`] has no side effects beyond the outbound model
//! call. Persisting the result is the caller's job (see `daily`).

/// Structural validation of generated JSON
pub mod schema;

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use wodx_core::errors::{AppError, AppResult};
use wodx_core::models::{DailyWorkout, MAX_HISTORY};

use crate::config::LlmConfig;
use crate::constants::generation;
use crate::llm::prompts::PromptProfile;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider};

/// Message returned when no model credential is configured
pub const MISSING_API_KEY_MESSAGE: &str = "Missing OpenAI API key.";

/// Message returned when the model reply is not JSON
pub const MALFORMED_REPLY_MESSAGE: &str = "Failed to parse workout JSON from model.";

/// Generates one workout per call from a bounded history
#[derive(Clone)]
pub struct WorkoutGenerator {
    provider: Option<Arc<dyn LlmProvider>>,
    profile: PromptProfile,
}

impl WorkoutGenerator {
    /// Generator backed by `provider`; `None` makes every call fail with `CONFIG_MISSING`
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, profile: PromptProfile) -> Self {
        Self { provider, profile }
    }

    /// Build the generator from server settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let provider = match OpenAiCompatibleConfig::from_llm_config(config) {
            Some(provider_config) => {
                Some(Arc::new(OpenAiCompatibleProvider::new(provider_config)?) as Arc<dyn LlmProvider>)
            }
            None => None,
        };

        Ok(Self::new(provider, config.profile))
    }

    /// Prompt profile in use
    #[must_use]
    pub const fn profile(&self) -> PromptProfile {
        self.profile
    }

    /// Render the instruction for `history`
    ///
    /// History entries are embedded as given, compact and in key order.
    ///
    /// # Errors
    ///
    /// Returns an internal error if serialization fails
    pub fn build_prompt(&self, history: &[Value]) -> AppResult<String> {
        let schema = serde_json::to_string_pretty(&DailyWorkout::schema_example())
            .map_err(|e| AppError::internal(format!("Failed to serialize schema example: {e}")))?;
        let history = serde_json::to_string(history)
            .map_err(|e| AppError::internal(format!("Failed to serialize history: {e}")))?;

        Ok(self.profile.render(&schema, &history))
    }

    /// Generate the workout for `target_date` from `history` (oldest first, at most seven)
    ///
    /// The returned record is always dated `target_date`, whatever the model wrote.
    ///
    /// # Errors
    ///
    /// - `INVALID_INPUT` when the history exceeds seven records or an entry is not a workout
    /// - `CONFIG_MISSING` without a model credential
    /// - `UPSTREAM_ERROR` when the model endpoint fails
    /// - `MALFORMED_GENERATION` when the reply is not JSON
    /// - `SCHEMA_VALIDATION` when the JSON is not a workout
    #[instrument(skip(self, history), fields(history_len = history.len(), profile = %self.profile))]
    pub async fn generate(
        &self,
        history: &[Value],
        target_date: NaiveDate,
    ) -> AppResult<DailyWorkout> {
        if history.len() > MAX_HISTORY {
            return Err(AppError::invalid_input(format!(
                "History may contain at most {MAX_HISTORY} workouts, got {}",
                history.len()
            )));
        }
        for (index, entry) in history.iter().enumerate() {
            schema::validate_history_entry(index, entry)?;
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| AppError::config_missing(MISSING_API_KEY_MESSAGE))?;

        let request = ChatRequest::new(vec![
            ChatMessage::system(self.profile.persona()),
            ChatMessage::user(self.build_prompt(history)?),
        ])
        .with_model(provider.default_model())
        .with_temperature(generation::TEMPERATURE)
        .with_max_tokens(generation::MAX_TOKENS);

        let response = provider.complete(&request).await?;
        debug!(model = %response.model, finish_reason = ?response.finish_reason, "Model replied");

        let workout = parse_workout(&response.content, target_date)?;
        info!(date = %workout.date, kind = %workout.kind, "Generated workout");
        Ok(workout)
    }
}

/// Stored records as prompt history values
///
/// # Errors
///
/// Returns an internal error if a record cannot be serialized
pub fn history_values(records: &[DailyWorkout]) -> AppResult<Vec<Value>> {
    records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .map_err(|e| AppError::internal(format!("Failed to serialize history: {e}")))
        })
        .collect()
}

/// Strip an enclosing Markdown code fence, if any
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") on the opening line
    body.split_once('\n').map_or(body, |(_, inner)| inner).trim()
}

/// Parse and validate a model reply, stamping it with `date`
///
/// # Errors
///
/// Returns `MALFORMED_GENERATION` for non-JSON text and `SCHEMA_VALIDATION`
/// for JSON that is not a workout
pub fn parse_workout(content: &str, date: NaiveDate) -> AppResult<DailyWorkout> {
    let mut value: Value = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        warn!("Model reply is not JSON: {e}");
        AppError::malformed_generation(MALFORMED_REPLY_MESSAGE).with_source(e)
    })?;

    schema::validate_workout(&value)?;

    if let Some(object) = value.as_object_mut() {
        object.insert("date".to_owned(), Value::String(date.to_string()));
    }

    serde_json::from_value::<DailyWorkout>(value).map_err(|e| {
        AppError::schema_validation(format!("Generated workout does not match the schema: {e}"))
    })
}
