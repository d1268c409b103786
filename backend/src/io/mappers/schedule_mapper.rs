//! Conversions between the wire DTOs of the `shared` crate and the
//! schedule service's command and view types.

use shared::{
    CreateScheduleRequest, ScheduleIdListResponse, ScheduleIdResponse, ScheduleResponse,
    TakingListResponse, TakingResponse,
};

use crate::domain::commands::schedules::{CreateScheduleCommand, ScheduleView, TakingView};
use crate::domain::models::schedule::{MAX_FREQUENCY, MIN_FREQUENCY};
use crate::domain::models::ScheduleError;

/// Mapper between schedule DTOs and service types.
pub struct ScheduleMapper;

impl ScheduleMapper {
    /// Validates a create request and converts it into a service command.
    pub fn to_create_command(request: CreateScheduleRequest) -> Result<CreateScheduleCommand, ScheduleError> {
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&request.frequency) {
            return Err(ScheduleError::InvalidFrequency(request.frequency));
        }
        if request.medicine_name.trim().is_empty() {
            return Err(ScheduleError::InvalidInput(
                "medicine_name is required".to_string(),
            ));
        }
        if request.duration < 0 {
            return Err(ScheduleError::InvalidInput(
                "duration cannot be negative".to_string(),
            ));
        }
        if request.user_id < 1 {
            return Err(ScheduleError::InvalidInput(
                "user_id must be positive".to_string(),
            ));
        }

        Ok(CreateScheduleCommand {
            medicine_name: request.medicine_name,
            frequency: request.frequency,
            duration: request.duration,
            user_id: request.user_id,
        })
    }

    pub fn to_id_dto(id: i64) -> ScheduleIdResponse {
        ScheduleIdResponse { id }
    }

    pub fn to_schedule_dto(view: ScheduleView) -> ScheduleResponse {
        ScheduleResponse {
            id: view.id,
            medicine_name: view.medicine_name,
            start_date: view.start_date,
            end_date: view.end_date,
            user_id: view.user_id,
            taking_time: view.taking_times,
        }
    }

    pub fn to_id_list_dto(schedule_ids: Vec<i64>) -> ScheduleIdListResponse {
        ScheduleIdListResponse { schedule_ids }
    }

    pub fn to_taking_list_dto(takings: Vec<TakingView>) -> TakingListResponse {
        TakingListResponse {
            takings: takings
                .into_iter()
                .map(|t| TakingResponse {
                    medicine_name: t.medicine_name,
                    taking_time: t.taking_time,
                })
                .collect(),
        }
    }
}
