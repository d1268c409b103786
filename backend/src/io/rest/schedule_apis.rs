//! # REST API for Schedules
//!
//! Endpoints for creating schedules and querying upcoming doses.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::{CreateScheduleRequest, ErrorResponse, GetScheduleRequest, UserIdRequest};
use tracing::{error, info, warn};

use crate::domain::models::ScheduleError;
use crate::io::mappers::ScheduleMapper;
use crate::masking::mask_user_id;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schedule", post(create_schedule).get(get_schedule))
        .route("/schedules", get(get_schedule_ids))
        .route("/next_takings", get(get_next_takings))
}

/// Status code and public message for a domain error.
fn error_response(err: &ScheduleError) -> Response {
    let (status, message) = match err {
        ScheduleError::InvalidFrequency(_) | ScheduleError::InvalidInput(_) => {
            warn!("Rejected request: {}", err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ScheduleError::ScheduleNotFound => (StatusCode::NOT_FOUND, "schedule not found".to_string()),
        ScheduleError::ScheduleAlreadyExists => {
            (StatusCode::CONFLICT, "schedule already exists".to_string())
        }
        ScheduleError::Internal(_) => {
            error!("Internal error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse::new(message))).into_response()
}

fn bad_request(message: String) -> Response {
    warn!("Rejected request: {}", message);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// Create a new schedule
async fn create_schedule(
    State(state): State<AppState>,
    payload: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return bad_request(format!("invalid request body: {}", rejection.body_text())),
    };

    info!(
        medicine = %request.medicine_name,
        user_id = %mask_user_id(request.user_id),
        "POST /schedule"
    );

    let command = match ScheduleMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return error_response(&e),
    };

    match state.schedule_service.create_schedule(command).await {
        Ok(id) => (StatusCode::CREATED, Json(ScheduleMapper::to_id_dto(id))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Get a schedule by id
async fn get_schedule(
    State(state): State<AppState>,
    query: Result<Query<GetScheduleRequest>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(format!("invalid query: {}", rejection.body_text())),
    };

    info!(
        user_id = %mask_user_id(params.user_id),
        schedule_id = params.schedule_id,
        "GET /schedule"
    );

    match state
        .schedule_service
        .get_schedule(params.user_id, params.schedule_id)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(ScheduleMapper::to_schedule_dto(view))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// List the ids of the user's active schedules
async fn get_schedule_ids(
    State(state): State<AppState>,
    query: Result<Query<UserIdRequest>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(format!("invalid query: {}", rejection.body_text())),
    };

    info!(user_id = %mask_user_id(params.user_id), "GET /schedules");

    match state.schedule_service.get_schedule_ids(params.user_id).await {
        Ok(ids) => (StatusCode::OK, Json(ScheduleMapper::to_id_list_dto(ids))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// List the doses due within the lookahead interval
async fn get_next_takings(
    State(state): State<AppState>,
    query: Result<Query<UserIdRequest>, QueryRejection>,
) -> Response {
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(format!("invalid query: {}", rejection.body_text())),
    };

    info!(user_id = %mask_user_id(params.user_id), "GET /next_takings");

    match state.schedule_service.get_next_takings(params.user_id).await {
        Ok(takings) => {
            (StatusCode::OK, Json(ScheduleMapper::to_taking_list_dto(takings))).into_response()
        }
        Err(e) => error_response(&e),
    }
}
