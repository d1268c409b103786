//! # RPC Interface Layer
//!
//! JSON-RPC 2.0 over HTTP, served on its own listener. Exposes the same four
//! operations as the REST API: `create_schedule`, `get_schedule`,
//! `get_schedule_ids` and `get_next_takings`.

pub mod error;
pub mod server;
pub mod types;

pub use error::RpcError;
pub use server::router;
