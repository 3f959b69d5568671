//! # flowforms-log
//!
//! Subscriber setup for applications embedding `flowforms-core`. The engine
//! itself only emits `tracing` events; this crate decides where they go.
//!
//! ```rust,no_run
//! use flowforms_log::{Config, LoggerBuilder};
//!
//! # fn main() -> flowforms_log::LogResult<()> {
//! let _guard = LoggerBuilder::from_config(Config::from_env()).build()?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```
//!
//! Environment variables read by [`Config::from_env`]:
//!
//! - `FLOWFORMS_LOG` (falls back to `RUST_LOG`): filter directives
//! - `FLOWFORMS_LOG_FORMAT`: `pretty`, `compact` or `json`

#![warn(missing_docs)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Initializes logging from the environment.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init() -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(Config::from_env()).build()
}
