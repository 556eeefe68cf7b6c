//! HTTP API for dashboard configuration.
//!
//! Thin axum handlers that translate requests into `ConfigStore` calls.
//! Enabled by the `serve` command (the default).

mod server;

pub use server::{ApiServer, ServerHandle, build_router, start_server};
