//! # Pills Reminder Backend
//!
//! Medication schedule reminder service.
//!
//! Clients create a dosage schedule (medicine, doses per day, duration) and
//! the service derives the daily taking times, stores them, and answers
//! "what is due in the next N minutes" queries. The same operations are
//! served over a REST API and a JSON-RPC API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST handlers, JSON-RPC dispatcher, middleware)
//!     ↓
//! Domain Layer (ScheduleService, Schedule entity, taking-time calculator)
//!     ↓
//! Storage Layer (ScheduleStorage trait, SQLite repository)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod masking;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    middleware, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, HttpConfig};
use crate::domain::{ScheduleService, SystemClock};
use crate::io::middleware::trace_requests;
use crate::storage::{DbConnection, ScheduleRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub schedule_service: ScheduleService,
}

impl AppState {
    pub fn new(schedule_service: ScheduleService) -> Self {
        Self { schedule_service }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::new(&config.database.url, config.database.max_connections).await?;

    info!("Setting up domain model");
    let storage = Arc::new(ScheduleRepository::new(db_conn));
    let schedule_service = ScheduleService::new(storage, Arc::new(SystemClock), config.lookahead());

    Ok(AppState::new(schedule_service))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Create the REST router with CORS, request timeout and request logging
pub fn create_router(app_state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .merge(io::rest::router())
        .layer(middleware::from_fn(trace_requests))
        .layer(TimeoutLayer::new(http.timeout()))
        .layer(cors_layer(&http.cors_origins))
        .with_state(app_state)
}

/// Create the JSON-RPC router
pub fn create_rpc_router(app_state: AppState) -> Router {
    Router::new()
        .merge(io::rpc::router())
        .layer(middleware::from_fn(trace_requests))
        .with_state(app_state)
}
