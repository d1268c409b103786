//! # Domain Module
//!
//! Business logic of the reminder service.
//!
//! ## Module Organization
//!
//! - **models**: the `Schedule` entity, the taking-time calculator and the
//!   domain error type
//! - **schedule_service**: orchestrates creation and queries on top of a store
//! - **clock**: injectable source of the current local time
//! - **commands**: service-level input and output types
//!
//! ## Business Rules
//!
//! - A schedule takes between 1 and 15 doses a day, spread over 08:00–22:00
//! - A duration of 0 days means the schedule never ends
//! - A medicine name is unique per user
//! - All dates and times are on the server's local clock

pub mod clock;
pub mod commands;
pub mod models;
pub mod schedule_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use schedule_service::ScheduleService;
