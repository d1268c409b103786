//! Shared fixtures for handler and service tests.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::models::{Schedule, Taking};
use crate::domain::{FixedClock, ScheduleService};
use crate::storage::{DbConnection, ScheduleRepository, ScheduleStorage, StorageError};
use crate::AppState;

pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid datetime")
}

/// App state over a fresh in-memory database with the clock frozen at `now`.
pub async fn test_state(now: NaiveDateTime) -> Result<AppState> {
    crate::logging::init_test();
    let db = DbConnection::init_test().await?;
    let storage = Arc::new(ScheduleRepository::new(db));
    Ok(AppState::new(ScheduleService::new(
        storage,
        Arc::new(FixedClock(now)),
        Duration::minutes(60),
    )))
}

/// App state whose store fails every call.
pub fn failing_state(now: NaiveDateTime) -> AppState {
    AppState::new(ScheduleService::new(
        Arc::new(FailingStorage),
        Arc::new(FixedClock(now)),
        Duration::minutes(60),
    ))
}

/// Store whose every operation fails with a database error
pub struct FailingStorage;

#[async_trait]
impl ScheduleStorage for FailingStorage {
    async fn create(&self, _schedule: &Schedule) -> Result<i64, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_id(&self, _user_id: i64, _schedule_id: i64) -> Result<Schedule, StorageError> {
        Err(StorageError::Corrupt("bad row".to_string()))
    }

    async fn get_active_ids(&self, _user_id: i64, _as_of: NaiveDate) -> Result<Vec<i64>, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolClosed))
    }

    async fn get_due_takings(
        &self,
        _user_id: i64,
        _window_start: NaiveDateTime,
        _window_end: NaiveDateTime,
        _as_of: NaiveDate,
    ) -> Result<Vec<Taking>, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolClosed))
    }
}
