//! Configuration and shared utilities for the Atrium console client.
//!
//! This crate provides:
//! - Client configuration with compile-time defaults and env overrides
//! - File system paths for persisted client state
//! - Logging initialization

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_API_ORIGIN, DEFAULT_API_PREFIX, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
