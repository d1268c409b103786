//! # SQLite Storage Module
//!
//! SQLite-backed implementation of the schedule store.
//!
//! ## Components
//!
//! - **connection.rs** - connection pool and schema setup
//! - **schedule_repository.rs** - schedules and their taking times

pub mod connection;
pub mod schedule_repository;

pub use connection::DbConnection;
pub use schedule_repository::ScheduleRepository;
