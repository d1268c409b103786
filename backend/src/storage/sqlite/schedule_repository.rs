use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{sqlite::SqliteRow, Row, Sqlite, Transaction};
use tracing::{error, info, warn};

use crate::domain::models::{Schedule, Taking, TakingTime};
use crate::masking::mask_user_id;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{ScheduleStorage, StorageError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Repository for schedule operations
#[derive(Clone)]
pub struct ScheduleRepository {
    db: DbConnection,
}

impl ScheduleRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert the schedule row and its taking times inside `tx`
    async fn insert_schedule(
        tx: &mut Transaction<'_, Sqlite>,
        schedule: &Schedule,
    ) -> Result<i64, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO schedules (medicine_name, frequency, duration, start_date, end_date, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(schedule.medicine_name())
        .bind(i64::from(schedule.frequency()))
        .bind(i64::from(schedule.duration()))
        .bind(schedule.start_date().format(DATE_FORMAT).to_string())
        .bind(schedule.end_date().map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(schedule.user_id())
        .execute(&mut **tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StorageError::AlreadyExists
            }
            other => StorageError::Database(other),
        })?;

        let schedule_id = result.last_insert_rowid();

        for taking_time in schedule.taking_times() {
            sqlx::query(
                r#"
                INSERT INTO takings (schedule_id, taking_time)
                VALUES (?, ?)
                "#,
            )
            .bind(schedule_id)
            .bind(taking_time.to_string())
            .execute(&mut **tx)
            .await?;
        }

        Ok(schedule_id)
    }

    fn schedule_from_row(row: &SqliteRow, taking_times: Vec<TakingTime>) -> Result<Schedule, StorageError> {
        let frequency: i64 = row.try_get("frequency")?;
        let duration: i64 = row.try_get("duration")?;
        let start_date: String = row.try_get("start_date")?;
        let end_date: Option<String> = row.try_get("end_date")?;

        let frequency = u32::try_from(frequency)
            .map_err(|_| StorageError::Corrupt(format!("invalid frequency {}", frequency)))?;
        let duration = u32::try_from(duration)
            .map_err(|_| StorageError::Corrupt(format!("invalid duration {}", duration)))?;

        Ok(Schedule::restore(
            row.try_get("id")?,
            row.try_get("medicine_name")?,
            frequency,
            duration,
            parse_date(&start_date)?,
            end_date.as_deref().map(parse_date).transpose()?,
            row.try_get("user_id")?,
            taking_times,
        ))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("invalid date '{}': {}", value, e)))
}

fn parse_taking_time(value: &str) -> Result<TakingTime, StorageError> {
    TakingTime::parse(value).map_err(StorageError::Corrupt)
}

#[async_trait]
impl ScheduleStorage for ScheduleRepository {
    async fn create(&self, schedule: &Schedule) -> Result<i64, StorageError> {
        info!(
            medicine = %schedule.medicine_name(),
            user_id = %mask_user_id(schedule.user_id()),
            "Creating schedule with {} taking times",
            schedule.taking_times().len()
        );

        let mut tx = self.db.pool().begin().await?;

        match Self::insert_schedule(&mut tx, schedule).await {
            Ok(schedule_id) => {
                tx.commit().await?;
                info!(schedule_id, "Schedule created");
                Ok(schedule_id)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Failed to roll back schedule creation: {}", rollback_err);
                }
                match e {
                    StorageError::AlreadyExists => warn!("Schedule already exists"),
                    ref other => error!("Failed to create schedule: {}", other),
                }
                Err(e)
            }
        }
    }

    async fn get_by_id(&self, user_id: i64, schedule_id: i64) -> Result<Schedule, StorageError> {
        info!(user_id = %mask_user_id(user_id), schedule_id, "Getting schedule by id");

        let row = sqlx::query(
            r#"
            SELECT id, medicine_name, frequency, duration, start_date, end_date, user_id
            FROM schedules
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(schedule_id)
        .fetch_optional(self.db.pool())
        .await?;

        let row = match row {
            Some(r) => r,
            None => {
                info!(schedule_id, "Schedule was not found");
                return Err(StorageError::NotFound);
            }
        };

        let taking_rows = sqlx::query(
            r#"
            SELECT taking_time
            FROM takings
            WHERE schedule_id = ?
            ORDER BY taking_time ASC
            "#,
        )
        .bind(schedule_id)
        .fetch_all(self.db.pool())
        .await?;

        let taking_times = taking_rows
            .iter()
            .map(|r| {
                let value: String = r.try_get("taking_time")?;
                parse_taking_time(&value)
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Self::schedule_from_row(&row, taking_times)
    }

    async fn get_active_ids(&self, user_id: i64, as_of: NaiveDate) -> Result<Vec<i64>, StorageError> {
        info!(user_id = %mask_user_id(user_id), %as_of, "Getting active schedule ids");

        let as_of = as_of.format(DATE_FORMAT).to_string();
        let rows = sqlx::query(
            r#"
            SELECT id
            FROM schedules
            WHERE user_id = ?
              AND start_date <= ?
              AND (end_date IS NULL OR end_date >= ?)
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(&as_of)
        .bind(&as_of)
        .fetch_all(self.db.pool())
        .await?;

        let ids = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(ids)
    }

    async fn get_due_takings(
        &self,
        user_id: i64,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
        as_of: NaiveDate,
    ) -> Result<Vec<Taking>, StorageError> {
        info!(
            user_id = %mask_user_id(user_id),
            %window_start,
            %window_end,
            "Getting due takings"
        );

        let as_of = as_of.format(DATE_FORMAT).to_string();
        let rows = sqlx::query(
            r#"
            SELECT s.medicine_name, t.taking_time
            FROM takings t
            JOIN schedules s ON t.schedule_id = s.id
            WHERE s.user_id = ?
              AND s.start_date <= ?
              AND (s.end_date IS NULL OR s.end_date >= ?)
            "#,
        )
        .bind(user_id)
        .bind(&as_of)
        .bind(&as_of)
        .fetch_all(self.db.pool())
        .await?;

        let mut takings = Vec::new();
        for row in &rows {
            let medicine_name: String = row.try_get("medicine_name")?;
            let taking_time: String = row.try_get("taking_time")?;

            let occurrence = parse_taking_time(&taking_time)?.next_occurrence(window_start);
            if occurrence < window_end {
                takings.push(Taking {
                    medicine_name,
                    taking_time: occurrence,
                });
            }
        }

        takings.sort_by(|a, b| {
            a.taking_time
                .cmp(&b.taking_time)
                .then_with(|| a.medicine_name.cmp(&b.medicine_name))
        });

        Ok(takings)
    }
}
