//! Logging setup errors

/// Errors raised while installing the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LogError {
    /// Filter directives could not be parsed
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// The configuration could not be applied
    #[error("log configuration error: {0}")]
    Config(String),

    /// A global subscriber is already installed
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Result alias for this crate.
pub type LogResult<T> = Result<T, LogError>;
