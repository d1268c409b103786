//! # Storage Module
//!
//! Handles persistence of schedules for the reminder service.
//!
//! The domain layer only sees the [`ScheduleStorage`] trait. The SQLite
//! implementation lives in [`sqlite`] and can be swapped out without touching
//! the service or the transport adapters.
//!
//! ## Key Responsibilities
//!
//! - **Atomic creation**: a schedule and all of its taking times are written
//!   in one transaction
//! - **Per-user queries**: every read is scoped to the owning user
//! - **Active-range filtering**: only schedules live on the given day are
//!   returned by the listing queries

pub mod sqlite;
pub mod traits;

pub use sqlite::{DbConnection, ScheduleRepository};
pub use traits::{ScheduleStorage, StorageError};
