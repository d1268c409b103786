/// Errors surfaced by the schedule domain.
///
/// This is the only error type that crosses the service boundary; storage
/// failures are classified into it before reaching a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("frequency must be between 1 and 15, got {0}")]
    InvalidFrequency(i64),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("schedule was not found")]
    ScheduleNotFound,
    #[error("schedule already exists")]
    ScheduleAlreadyExists,
    /// Unclassified persistence or I/O failure. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}
