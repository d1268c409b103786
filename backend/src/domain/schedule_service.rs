use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};

use crate::domain::clock::Clock;
use crate::domain::commands::schedules::{CreateScheduleCommand, ScheduleView, TakingView};
use crate::domain::models::{Schedule, ScheduleError};
use crate::masking::mask_user_id;
use crate::storage::traits::{ScheduleStorage, StorageError};

const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";
const UNBOUNDED_END_DATE: &str = "infinite";

/// Service for creating and querying medication schedules
#[derive(Clone)]
pub struct ScheduleService {
    storage: Arc<dyn ScheduleStorage>,
    clock: Arc<dyn Clock>,
    lookahead: Duration,
}

impl ScheduleService {
    /// Create a new ScheduleService.
    ///
    /// `lookahead` is the interval after "now" in which a dose counts as due.
    pub fn new(storage: Arc<dyn ScheduleStorage>, clock: Arc<dyn Clock>, lookahead: Duration) -> Self {
        Self {
            storage,
            clock,
            lookahead,
        }
    }

    /// Create a new schedule and return its id
    pub async fn create_schedule(&self, command: CreateScheduleCommand) -> Result<i64, ScheduleError> {
        info!(
            medicine = %command.medicine_name,
            frequency = command.frequency,
            duration = command.duration,
            user_id = %mask_user_id(command.user_id),
            "Creating schedule"
        );

        let schedule = Schedule::create(
            &command.medicine_name,
            command.frequency,
            command.duration,
            command.user_id,
            self.clock.now(),
        )
        .map_err(|e| {
            warn!("Rejected schedule: {}", e);
            e
        })?;

        let id = self
            .storage
            .create(&schedule)
            .await
            .map_err(|e| storage_error("create_schedule", e))?;

        info!(schedule_id = id, "Created schedule");
        Ok(id)
    }

    /// Get one of the user's schedules
    pub async fn get_schedule(&self, user_id: i64, schedule_id: i64) -> Result<ScheduleView, ScheduleError> {
        info!(user_id = %mask_user_id(user_id), schedule_id, "Getting schedule");

        require_positive(user_id, "user id")?;
        require_positive(schedule_id, "schedule id")?;

        let schedule = self
            .storage
            .get_by_id(user_id, schedule_id)
            .await
            .map_err(|e| storage_error("get_schedule", e))?;

        Ok(ScheduleView {
            id: schedule.id(),
            medicine_name: schedule.medicine_name().to_string(),
            start_date: schedule.start_date().format(DISPLAY_DATE_FORMAT).to_string(),
            end_date: schedule
                .end_date()
                .map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
                .unwrap_or_else(|| UNBOUNDED_END_DATE.to_string()),
            user_id: schedule.user_id(),
            taking_times: schedule.taking_times().iter().map(|t| t.to_string()).collect(),
        })
    }

    /// Ids of the user's schedules active today, ascending
    pub async fn get_schedule_ids(&self, user_id: i64) -> Result<Vec<i64>, ScheduleError> {
        info!(user_id = %mask_user_id(user_id), "Getting schedule ids");

        require_positive(user_id, "user id")?;

        let today = self.clock.now().date();
        let ids = self
            .storage
            .get_active_ids(user_id, today)
            .await
            .map_err(|e| storage_error("get_schedule_ids", e))?;

        info!("Found {} active schedules", ids.len());
        Ok(ids)
    }

    /// Doses due within the lookahead interval, in chronological order
    pub async fn get_next_takings(&self, user_id: i64) -> Result<Vec<TakingView>, ScheduleError> {
        info!(user_id = %mask_user_id(user_id), "Getting next takings");

        require_positive(user_id, "user id")?;

        let now = self.clock.now();
        let window_end = now.checked_add_signed(self.lookahead).ok_or_else(|| {
            error!(lookahead = %self.lookahead, "Lookahead window is out of range");
            ScheduleError::Internal("lookahead window is out of range".to_string())
        })?;
        let takings = self
            .storage
            .get_due_takings(user_id, now, window_end, now.date())
            .await
            .map_err(|e| storage_error("get_next_takings", e))?;

        info!("Found {} upcoming takings", takings.len());
        Ok(takings
            .into_iter()
            .map(|t| TakingView {
                taking_time: t.format_time(),
                medicine_name: t.medicine_name,
            })
            .collect())
    }
}

fn require_positive(value: i64, field: &str) -> Result<(), ScheduleError> {
    if value <= 0 {
        warn!("Rejected request: {} must be positive, got {}", field, value);
        return Err(ScheduleError::InvalidInput(format!("{} must be positive", field)));
    }
    Ok(())
}

/// Classify a store failure into the domain error set.
fn storage_error(operation: &str, err: StorageError) -> ScheduleError {
    match err {
        StorageError::AlreadyExists => ScheduleError::ScheduleAlreadyExists,
        StorageError::NotFound => ScheduleError::ScheduleNotFound,
        other => {
            error!(operation, error = %other, "Storage failure");
            ScheduleError::Internal(other.to_string())
        }
    }
}
