//! Logger builder
//!
//! The same subscriber stack can be installed process-wide ([`LoggerBuilder::build`])
//! or for the current thread only ([`LoggerBuilder::build_scoped`]). The
//! scoped form suits tests, where many of them share one process and each
//! wants its own output settings.

use tracing::dispatcher::DefaultGuard;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps an installed logger in place.
///
/// For a scoped logger, dropping the guard restores the previous
/// subscriber of the thread. A global logger stays installed regardless.
#[derive(Debug)]
#[must_use = "dropping the guard uninstalls a scoped logger"]
pub struct LoggerGuard {
    scope: Option<DefaultGuard>,
}

impl LoggerGuard {
    /// Whether the logger only applies to the thread that built it.
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Install {
    Global,
    Thread,
}

/// Common fmt layer decoration.
macro_rules! fmt_layer {
    ($display:expr) => {
        tracing_subscriber::fmt::layer()
            .with_ansi($display.colors)
            .with_file($display.source)
            .with_line_number($display.source)
            .with_target($display.target)
    };
}

/// Installs `Registry + filter + fmt` globally or for the current thread.
macro_rules! install_subscriber {
    ($install:expr, $filter:expr, $fmt_layer:expr) => {{
        let subscriber = Registry::default().with($filter).with($fmt_layer);
        match $install {
            Install::Global => subscriber.try_init().map(|()| None),
            Install::Thread => Ok(Some(subscriber.set_default())),
        }
    }};
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Installs the process-wide subscriber.
    ///
    /// # Errors
    ///
    /// - [`LogError::Filter`] if the filter directives do not parse
    /// - [`LogError::AlreadyInitialized`] if a global subscriber exists
    pub fn build(self) -> LogResult<LoggerGuard> {
        self.install(Install::Global)
    }

    /// Installs the subscriber for the current thread until the guard is
    /// dropped. Can be called any number of times.
    ///
    /// # Errors
    ///
    /// [`LogError::Filter`] if the filter directives do not parse.
    pub fn build_scoped(self) -> LogResult<LoggerGuard> {
        self.install(Install::Thread)
    }

    fn install(self, install: Install) -> LogResult<LoggerGuard> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))?;

        let display = &self.config.display;
        let installed = match (self.config.format, display.time) {
            (Format::Pretty, true) => install_subscriber!(install, filter, fmt_layer!(display).pretty()),
            (Format::Pretty, false) => {
                install_subscriber!(install, filter, fmt_layer!(display).pretty().without_time())
            }
            (Format::Compact, true) => {
                install_subscriber!(install, filter, fmt_layer!(display).compact())
            }
            (Format::Compact, false) => {
                install_subscriber!(install, filter, fmt_layer!(display).compact().without_time())
            }
            (Format::Json, true) => install_subscriber!(install, filter, fmt_layer!(display).json()),
            (Format::Json, false) => {
                install_subscriber!(install, filter, fmt_layer!(display).json().without_time())
            }
        };
        let scope = installed.map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

        tracing::debug!(
            level = %self.config.level,
            format = ?self.config.format,
            scoped = scope.is_some(),
            "logger initialized"
        );

        Ok(LoggerGuard { scope })
    }
}
