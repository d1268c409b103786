//! # Storage Traits
//!
//! This module defines the storage abstraction that the schedule service
//! depends on, so the service can be exercised against any backend.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::models::{Schedule, Taking};

/// Failures reported by a schedule store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A schedule with the same medicine name already exists for the user
    #[error("schedule already exists")]
    AlreadyExists,
    #[error("schedule was not found")]
    NotFound,
    /// A stored row could not be decoded back into a schedule
    #[error("corrupt schedule data: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trait defining the interface for schedule storage operations
///
/// Implementations own persistence of schedules together with their taking
/// times. Dates are calendar dates on the local clock.
#[async_trait]
pub trait ScheduleStorage: Send + Sync {
    /// Persist a schedule and all of its taking times as one unit.
    /// Returns the identity assigned to the new schedule.
    async fn create(&self, schedule: &Schedule) -> Result<i64, StorageError>;

    /// Retrieve a user's schedule with its taking times
    async fn get_by_id(&self, user_id: i64, schedule_id: i64) -> Result<Schedule, StorageError>;

    /// Identities of the user's schedules active on `as_of`, ascending
    async fn get_active_ids(&self, user_id: i64, as_of: NaiveDate) -> Result<Vec<i64>, StorageError>;

    /// Doses of the user's schedules active on `as_of` that occur in
    /// `[window_start, window_end)`, in chronological order
    async fn get_due_takings(
        &self,
        user_id: i64,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
        as_of: NaiveDate,
    ) -> Result<Vec<Taking>, StorageError>;
}
