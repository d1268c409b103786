use serde::{Deserialize, Serialize};

/// Request body for creating a new medication schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// Display name of the medicine (must not be empty)
    pub medicine_name: String,
    /// Doses per day, 1 to 15
    pub frequency: i64,
    /// Days the schedule stays active, 0 for an unbounded schedule
    #[serde(default)]
    pub duration: i64,
    /// Owning user, must be positive
    pub user_id: i64,
}

/// Identity of a freshly created schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleIdResponse {
    pub id: i64,
}

/// Parameters identifying a single schedule of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetScheduleRequest {
    pub user_id: i64,
    pub schedule_id: i64,
}

/// Parameters for queries scoped to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdRequest {
    pub user_id: i64,
}

/// A schedule as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub medicine_name: String,
    /// Formatted as "DD Mon YYYY"
    pub start_date: String,
    /// Formatted as "DD Mon YYYY", or "infinite" for unbounded schedules
    pub end_date: String,
    pub user_id: i64,
    /// Daily taking times as "HH:MM", ascending
    pub taking_time: Vec<String>,
}

/// Identities of the schedules active today for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleIdListResponse {
    pub schedule_ids: Vec<i64>,
}

/// A dose that is due soon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakingResponse {
    pub medicine_name: String,
    /// Formatted as "HH:MM"
    pub taking_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakingListResponse {
    pub takings: Vec<TakingResponse>,
}

/// Error body returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
