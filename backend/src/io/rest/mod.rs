//! # REST API Interface Layer
//!
//! HTTP endpoints for the reminder service.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: create a schedule, read one back, list active
//!   schedules and upcoming doses
//! - **Input Validation**: malformed bodies and query strings are rejected
//!   with 400 before the service is called
//! - **Error Handling**: domain errors become status codes with a JSON
//!   `{"error": ...}` body

pub mod schedule_apis;

pub use schedule_apis::router;
