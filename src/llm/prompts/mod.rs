// ABOUTME: Workout generation prompts loaded at compile time
// ABOUTME: Defines the prompt profiles, their coach personas, and the template renderer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generation Prompts
//!
//! Prompts are loaded at compile time from markdown files. Each template has
//! two placeholders, `{{schema}}` and `{{history}}`, filled with
//! pretty-printed JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prompt for general crossfit programming with creative variety
pub const CROSSFIT_PROMPT: &str = include_str!("crossfit.md");

/// Prompt for postpartum-safe programming
pub const POSTPARTUM_PROMPT: &str = include_str!("postpartum.md");

const SCHEMA_PLACEHOLDER: &str = "{{schema}}";
const HISTORY_PLACEHOLDER: &str = "{{history}}";

/// Population the generator programs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptProfile {
    /// General crossfit athlete
    #[default]
    Crossfit,
    /// Athlete returning to training after giving birth
    Postpartum,
}

impl PromptProfile {
    /// Parse a profile name (case-insensitive)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "crossfit" => Some(Self::Crossfit),
            "postpartum" => Some(Self::Postpartum),
            _ => None,
        }
    }

    /// System message sent ahead of the instruction
    #[must_use]
    pub const fn persona(&self) -> &'static str {
        match self {
            Self::Crossfit => "You are an expert crossfit coach.",
            Self::Postpartum => {
                "You are an expert crossfit coach specialised in postpartum training."
            }
        }
    }

    /// Raw template for this profile
    #[must_use]
    pub const fn template(&self) -> &'static str {
        match self {
            Self::Crossfit => CROSSFIT_PROMPT,
            Self::Postpartum => POSTPARTUM_PROMPT,
        }
    }

    /// Fill the template with the schema example and history JSON
    #[must_use]
    pub fn render(&self, schema_json: &str, history_json: &str) -> String {
        self.template()
            .trim_end()
            .replace(SCHEMA_PLACEHOLDER, schema_json)
            .replace(HISTORY_PLACEHOLDER, history_json)
    }
}

impl fmt::Display for PromptProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crossfit => f.write_str("crossfit"),
            Self::Postpartum => f.write_str("postpartum"),
        }
    }
}
