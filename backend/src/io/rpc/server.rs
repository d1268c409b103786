//! JSON-RPC 2.0 endpoint for the schedule service.
//!
//! Every request is a single `POST /rpc` carrying one JSON-RPC object. The
//! HTTP status is always 200; failures travel in the `error` member.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use shared::{CreateScheduleRequest, GetScheduleRequest, UserIdRequest};

use super::error::RpcError;
use super::types::{JsonRpcRequest, JsonRpcResponse, RpcId, JSONRPC_VERSION};
use crate::domain::ScheduleService;
use crate::io::mappers::ScheduleMapper;
use crate::masking::mask_user_id;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/rpc", post(handle_rpc))
}

async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Json<JsonRpcResponse> {
    // Parse as a generic value first so a usable id can be echoed even when
    // the request shape is wrong.
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Failed to parse JSON");
            return Json(JsonRpcResponse::error(RpcId::Null, RpcError::Parse(e).to_rpc_error()));
        }
    };

    let request = match parse_request(raw) {
        Ok(request) => request,
        Err((id, e)) => {
            warn!(error = %e, "Invalid JSON-RPC request");
            return Json(JsonRpcResponse::error(id, e.to_rpc_error()));
        }
    };

    Json(handle_request(&state.schedule_service, request).await)
}

fn parse_request(raw: Value) -> Result<JsonRpcRequest, (RpcId, RpcError)> {
    let id = raw
        .get("id")
        .and_then(|v| serde_json::from_value::<RpcId>(v.clone()).ok())
        .unwrap_or(RpcId::Null);

    if raw.get("id").is_none() {
        return Err((id, RpcError::InvalidRequest("missing id".to_string())));
    }

    let request: JsonRpcRequest = serde_json::from_value(raw)
        .map_err(|e| (id.clone(), RpcError::InvalidRequest(e.to_string())))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err((
            id,
            RpcError::InvalidRequest(format!("unsupported jsonrpc version {}", request.jsonrpc)),
        ));
    }

    Ok(request)
}

/// Handle a single JSON-RPC request and produce a response.
pub async fn handle_request(service: &ScheduleService, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();
    debug!(method = %request.method, "Handling RPC request");

    let result = match request.method.as_str() {
        "create_schedule" => create_schedule(service, request.params).await,
        "get_schedule" => get_schedule(service, request.params).await,
        "get_schedule_ids" => get_schedule_ids(service, request.params).await,
        "get_next_takings" => get_next_takings(service, request.params).await,
        method => {
            warn!(method = %method, "Unknown method");
            Err(RpcError::MethodNotFound(method.to_string()))
        }
    };

    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, e.to_rpc_error()),
    }
}

fn params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))
}

fn encode<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Encode(e.to_string()))
}

async fn create_schedule(service: &ScheduleService, raw: Option<Value>) -> Result<Value, RpcError> {
    let request: CreateScheduleRequest = params(raw)?;
    info!(
        medicine = %request.medicine_name,
        user_id = %mask_user_id(request.user_id),
        "rpc create_schedule"
    );

    let command = ScheduleMapper::to_create_command(request)?;
    let id = service.create_schedule(command).await?;
    encode(ScheduleMapper::to_id_dto(id))
}

async fn get_schedule(service: &ScheduleService, raw: Option<Value>) -> Result<Value, RpcError> {
    let request: GetScheduleRequest = params(raw)?;
    info!(
        user_id = %mask_user_id(request.user_id),
        schedule_id = request.schedule_id,
        "rpc get_schedule"
    );

    let view = service.get_schedule(request.user_id, request.schedule_id).await?;
    encode(ScheduleMapper::to_schedule_dto(view))
}

async fn get_schedule_ids(service: &ScheduleService, raw: Option<Value>) -> Result<Value, RpcError> {
    let request: UserIdRequest = params(raw)?;
    info!(user_id = %mask_user_id(request.user_id), "rpc get_schedule_ids");

    let ids = service.get_schedule_ids(request.user_id).await?;
    encode(ScheduleMapper::to_id_list_dto(ids))
}

async fn get_next_takings(service: &ScheduleService, raw: Option<Value>) -> Result<Value, RpcError> {
    let request: UserIdRequest = params(raw)?;
    info!(user_id = %mask_user_id(request.user_id), "rpc get_next_takings");

    let takings = service.get_next_takings(request.user_id).await?;
    encode(ScheduleMapper::to_taking_list_dto(takings))
}
