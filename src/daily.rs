// ABOUTME: Daily workflow owning the generate-and-persist step for today's workout
// ABOUTME: Serializes generation per calendar date so each day is generated and stored at most once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Daily Workflow
//!
//! The single component that writes records. HTTP handlers go through
//! [`DailyWorkflow::save`] or [`DailyWorkflow::generate_today`]; the generator
//! itself never persists.
//!
//! A per-date async mutex is held across generate + save. A second request
//! for the same date waits, then finds the stored record and returns it.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, instrument};
use wodx_core::errors::AppResult;
use wodx_core::models::{recent_history, DailyWorkout};
use wodx_core::pagination::{paginate_recent_first, FeedPage};

use crate::generation::{history_values, WorkoutGenerator};
use crate::storage::WorkoutStore;

/// Source of "today" for the generate action
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Current UTC calendar date
#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Result of a generate-today action
#[derive(Debug, Clone)]
pub struct TodayOutcome {
    /// Today's record
    pub workout: DailyWorkout,
    /// Whether this call generated it (false when it already existed)
    pub created: bool,
}

/// Generate-and-persist coordinator
#[derive(Clone)]
pub struct DailyWorkflow {
    store: Arc<dyn WorkoutStore>,
    generator: WorkoutGenerator,
    locks: Arc<DashMap<NaiveDate, Arc<Mutex<()>>>>,
    clock: Clock,
}

impl DailyWorkflow {
    /// Workflow over `store` dated by the UTC calendar
    #[must_use]
    pub fn new(store: Arc<dyn WorkoutStore>, generator: WorkoutGenerator) -> Self {
        Self::with_clock(store, generator, Arc::new(utc_today))
    }

    /// Workflow with an explicit clock
    #[must_use]
    pub fn with_clock(
        store: Arc<dyn WorkoutStore>,
        generator: WorkoutGenerator,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            generator,
            locks: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Current calendar date
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// Backing store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn WorkoutStore> {
        &self.store
    }

    /// Full collection, ascending by date
    pub async fn records(&self) -> AppResult<Vec<DailyWorkout>> {
        self.store.list().await
    }

    /// One page of the most-recent-first feed, plus whether today has a record
    pub async fn feed(
        &self,
        page: usize,
        page_size: usize,
    ) -> AppResult<(FeedPage<DailyWorkout>, bool)> {
        let records = self.store.list().await?;
        let today = self.today();
        let has_today = records.iter().any(|r| r.date == today);
        Ok((paginate_recent_first(&records, page, page_size), has_today))
    }

    /// Generate a workout for today from caller-supplied history, without storing it
    pub async fn preview(&self, history: &[Value]) -> AppResult<DailyWorkout> {
        self.generator.generate(history, self.today()).await
    }

    /// Persist a record, rejecting a date that is already stored
    #[instrument(skip(self, record), fields(date = %record.date))]
    pub async fn save(&self, record: DailyWorkout) -> AppResult<DailyWorkout> {
        let date = record.date;
        let lock = self.lock_for(date);
        let result = {
            let _guard = lock.lock().await;
            self.store.append(record).await
        };
        self.release(date, lock);
        result
    }

    /// Make sure today has a workout, generating and storing one if needed
    #[instrument(skip(self))]
    pub async fn generate_today(&self) -> AppResult<TodayOutcome> {
        let today = self.today();
        let lock = self.lock_for(today);

        let result = {
            let _guard = lock.lock().await;
            self.generate_locked(today).await
        };
        self.release(today, lock);
        result
    }

    async fn generate_locked(&self, today: NaiveDate) -> AppResult<TodayOutcome> {
        if let Some(existing) = self.store.get_by_date(today).await? {
            info!(date = %today, "Workout already exists for today");
            return Ok(TodayOutcome {
                workout: existing,
                created: false,
            });
        }

        let records = self.store.list().await?;
        let history = history_values(recent_history(&records))?;
        let workout = self.generator.generate(&history, today).await?;
        let stored = self.store.append(workout).await?;

        info!(date = %stored.date, kind = %stored.kind, "Stored today's workout");
        Ok(TodayOutcome {
            workout: stored,
            created: true,
        })
    }

    fn lock_for(&self, date: NaiveDate) -> Arc<Mutex<()>> {
        self.locks
            .entry(date)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the map entry once no other request holds it
    fn release(&self, date: NaiveDate, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.locks.remove_if(&date, |_, l| Arc::strong_count(l) == 1);
    }
}
