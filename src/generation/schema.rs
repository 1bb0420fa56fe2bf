// ABOUTME: Structural validation of model-produced workout JSON
// ABOUTME: Checks field presence and types before the value is turned into a DailyWorkout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Validation runs on the raw [`Value`] so errors can name the offending
//! field with its JSON path (`mainWorkout.duration`) rather than surfacing a
//! serde position inside text the caller never saw.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use wodx_core::errors::{AppError, AppResult};
use wodx_core::models::WorkoutType;

/// Section keys in display order, as they appear on the wire
pub const SECTION_KEYS: [&str; 4] = ["warmup", "preWorkout", "mainWorkout", "cooldown"];

/// Validate a generated workout object
///
/// The `date` field is not checked; the caller overwrites it.
///
/// # Errors
///
/// Returns `SCHEMA_VALIDATION` naming the first field that is missing or has the wrong type
pub fn validate_workout(value: &Value) -> AppResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| AppError::schema_validation("Workout must be a JSON object"))?;

    match object.get("type") {
        Some(Value::String(kind)) if WorkoutType::parse(kind).is_some() => {}
        Some(_) => {
            return Err(AppError::schema_validation(
                "Field `type` must be \"workout\" or \"rest\"",
            ))
        }
        None => return Err(missing("type")),
    }

    for key in SECTION_KEYS {
        match object.get(key) {
            Some(Value::Object(section)) => validate_section(key, section)?,
            Some(_) => {
                return Err(AppError::schema_validation(format!(
                    "Field `{key}` must be an object"
                )))
            }
            None => return Err(missing(key)),
        }
    }

    match object.get("notes") {
        None | Some(Value::Null | Value::String(_)) => Ok(()),
        Some(_) => Err(AppError::schema_validation(
            "Field `notes` must be a string",
        )),
    }
}

/// Validate one caller-supplied history entry
///
/// Entries carry a real `date` and otherwise follow the workout shape. Extra
/// keys are allowed; the entry is embedded in the prompt as sent.
///
/// # Errors
///
/// Returns `INVALID_INPUT` naming the entry index and the offending field
pub fn validate_history_entry(index: usize, value: &Value) -> AppResult<()> {
    let invalid = |reason: &str| AppError::invalid_input(format!("Invalid history[{index}]: {reason}"));

    match value.get("date") {
        Some(Value::String(date)) if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() => {}
        Some(_) => return Err(invalid("Field `date` must be a YYYY-MM-DD string")),
        None => return Err(invalid("Workout is missing field `date`")),
    }

    validate_workout(value).map_err(|e| invalid(&e.message))
}

fn validate_section(key: &str, section: &Map<String, Value>) -> AppResult<()> {
    for field in ["title", "description"] {
        match section.get(field) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::schema_validation(format!(
                    "Field `{key}.{field}` must be a string"
                )))
            }
            None => return Err(missing(&format!("{key}.{field}"))),
        }
    }

    match section.get("duration") {
        None | Some(Value::Null) => {}
        Some(Value::Number(n)) if n.as_u64().is_some_and(|d| u32::try_from(d).is_ok()) => {}
        Some(_) => {
            return Err(AppError::schema_validation(format!(
                "Field `{key}.duration` must be a non-negative integer"
            )))
        }
    }

    match section.get("exercises") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(AppError::schema_validation(format!(
            "Field `{key}.exercises` must be a list of strings"
        ))),
    }
}

fn missing(path: &str) -> AppError {
    AppError::schema_validation(format!("Workout is missing field `{path}`"))
}
