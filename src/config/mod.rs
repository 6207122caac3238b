//! Configuration module for the Kalakobana server.
//!
//! Configuration is loaded from a JSON file merged over compiled-in
//! defaults, with environment overrides. The `PORT` environment variable
//! always wins for the listening port.
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Server behavior (room capacity, heartbeats, reconnect grace)
//! - [`timing`]: Phase timer durations
//! - [`logging`]: Logging configuration
//! - [`loader`]: Configuration loading functions
//! - [`defaults`]: Default value functions

// Submodules
pub mod defaults;
pub mod loader;
pub mod logging;
pub mod server;
pub mod timing;
pub mod types;

// Re-exports for convenience
pub use loader::load;

pub use logging::{LogFormat, LogLevel, LogRotation, LoggingConfig};

pub use server::ServerConfig;

pub use timing::TimingConfig;

pub use types::Config;
