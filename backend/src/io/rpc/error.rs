//! Error types for the RPC adapter.

use tracing::error;

use super::types::{error_codes, JsonRpcError};
use crate::domain::models::ScheduleError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Errors that can occur while serving an RPC request.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The body was not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON, but not a JSON-RPC 2.0 request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Failure reported by the schedule service.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Failed to encode result: {0}")]
    Encode(String),
}

impl RpcError {
    /// Convert to a JSON-RPC error object.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let (code, message) = match self {
            RpcError::Parse(_) => (error_codes::PARSE_ERROR, self.to_string()),
            RpcError::InvalidRequest(_) => (error_codes::INVALID_REQUEST, self.to_string()),
            RpcError::MethodNotFound(_) => (error_codes::METHOD_NOT_FOUND, self.to_string()),
            RpcError::InvalidParams(_) => (error_codes::INVALID_PARAMS, self.to_string()),
            RpcError::Schedule(e) => match e {
                ScheduleError::InvalidFrequency(_) | ScheduleError::InvalidInput(_) => {
                    (error_codes::INVALID_PARAMS, e.to_string())
                }
                ScheduleError::ScheduleNotFound => (error_codes::SCHEDULE_NOT_FOUND, e.to_string()),
                ScheduleError::ScheduleAlreadyExists => {
                    (error_codes::SCHEDULE_ALREADY_EXISTS, e.to_string())
                }
                ScheduleError::Internal(_) => {
                    error!("Internal error: {}", e);
                    (error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },
            RpcError::Encode(_) => {
                error!("{}", self);
                (error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE.to_string())
            }
        };
        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}
