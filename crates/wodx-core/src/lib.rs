// ABOUTME: Core types for the WODX daily workout service
// ABOUTME: Foundation crate with the workout record model, error taxonomy, and feed pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # WODX Core
//!
//! Shared types for the WODX service. Everything here is storage- and
//! transport-agnostic so the gateway, the generator, and the web layer can
//! exchange records without depending on each other.
//!
//! ## Modules
//!
//! - **errors**: `AppError` and `ErrorCode`, with optional axum response support
//! - **models**: `DailyWorkout` and `WorkoutSection`
//! - **pagination**: page math for the reverse-chronological feed

/// Unified error handling with standard error codes and HTTP mapping
pub mod errors;

/// Daily workout record model
pub mod models;

/// Page-based pagination over the most-recent-first feed
pub mod pagination;
