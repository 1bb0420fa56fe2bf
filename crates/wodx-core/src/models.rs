// ABOUTME: Daily workout record model shared by storage, generation, and presentation
// ABOUTME: Serializes with the camelCase JSON shape used on the wire and in the data file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of past records sent to the model as context
pub const MAX_HISTORY: usize = 7;

/// Kind of day a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    /// Training day
    #[default]
    Workout,
    /// Rest day; sections are still present but may be empty
    Rest,
}

impl WorkoutType {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Rest => "rest",
        }
    }

    /// Label shown on the feed card
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Workout => "Workout",
            Self::Rest => "Rest Day",
        }
    }

    /// Parse the wire representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "workout" => Some(Self::Workout),
            "rest" => Some(Self::Rest),
            _ => None,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phase of a day's activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkoutSection {
    /// Section heading, e.g. "Warm Up"
    pub title: String,
    /// Detailed instructions
    pub description: String,
    /// Duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Ordered list of exercises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<String>>,
}

impl WorkoutSection {
    /// Section with a title and description only
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration: None,
            exercises: None,
        }
    }

    /// Set the duration in minutes
    #[must_use]
    pub const fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Set the exercise list
    #[must_use]
    pub fn with_exercises(mut self, exercises: Vec<String>) -> Self {
        self.exercises = Some(exercises);
        self
    }
}

/// The persisted record of one day's plan
///
/// Created once by the generator, persisted once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWorkout {
    /// Calendar date, unique within a stored collection
    pub date: NaiveDate,
    /// Training or rest day
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    /// Warm up section
    pub warmup: WorkoutSection,
    /// Pre workout section
    pub pre_workout: WorkoutSection,
    /// Main workout section
    pub main_workout: WorkoutSection,
    /// Cooldown section
    pub cooldown: WorkoutSection,
    /// Free-form notes for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DailyWorkout {
    /// Sections in display order
    #[must_use]
    pub const fn sections(&self) -> [&WorkoutSection; 4] {
        [
            &self.warmup,
            &self.pre_workout,
            &self.main_workout,
            &self.cooldown,
        ]
    }

    /// Copy of this record stamped with `date`
    #[must_use]
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Example record embedded in the generation prompt to show the expected shape
    #[must_use]
    pub fn schema_example() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap_or(NaiveDate::MIN),
            kind: WorkoutType::Workout,
            warmup: WorkoutSection::new("Warm Up", "").with_duration(0),
            pre_workout: WorkoutSection::new("Pre Workout", "").with_duration(0),
            main_workout: WorkoutSection::new("Main Workout", "").with_duration(0),
            cooldown: WorkoutSection::new("Cooldown", "").with_duration(0),
            notes: Some(String::new()),
        }
    }
}

/// Last `MAX_HISTORY` records of an ascending collection, most recent last
#[must_use]
pub fn recent_history(records: &[DailyWorkout]) -> &[DailyWorkout] {
    &records[records.len().saturating_sub(MAX_HISTORY)..]
}
