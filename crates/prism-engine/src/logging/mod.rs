//! Logging utilities.
//!
//! Centralizes logger initialization. The engine logs through the standard
//! `log` facade; the backend here is `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
