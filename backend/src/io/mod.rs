//! # IO Module
//!
//! Adapter layer between the network and the schedule service.
//!
//! Both transports share the DTOs of the `shared` crate, the mapper in
//! [`mappers`] and the request middleware. Each one translates
//! `ScheduleError` into its own error vocabulary exactly once.

pub mod mappers;
pub mod middleware;
pub mod rest;
pub mod rpc;
