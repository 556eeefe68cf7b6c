//! Dashboard Configuration Manager Library
//!
//! This module exports the core components for testing and integration.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod skeleton;
pub mod store;
pub mod substitution;
pub mod types;
