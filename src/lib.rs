#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::too_many_arguments,
    clippy::too_many_lines
)]

//! # Kalakobana Server
//!
//! Authoritative server for Kalakobana, a realtime turn-based word game
//! ("Stadt-Land-Fluss"). Rooms, sessions, and game state live entirely in
//! memory; clients connect over WebSocket and exchange JSON events.

/// Server configuration and environment variables
pub mod config;

/// Letter pool, categories, and the scoring pass
pub mod game;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket event protocol definitions
pub mod protocol;

/// Room state, per-room game state machine, and the room registry
pub mod room;

/// Main server orchestration
pub mod server;

/// Session tokens and reconnection grace timers
pub mod session;

/// WebSocket connection handling
pub mod websocket;
