//! Asynchronous services and external integrations
//!
//! This module contains everything that talks to the outside world: the
//! remote lint/execute service, durable storage, export archives and the
//! example gallery on disk.

pub mod async_bridge;
pub mod examples;
pub mod export;
pub mod persistence;
pub mod remote;
pub mod time_source;
pub mod tracing_setup;
