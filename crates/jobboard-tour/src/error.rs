//! Error types for the walkthrough binary.
//!
//! [`TourError`] is the top-level error type that wraps all possible
//! failure modes during startup and the walkthroughs themselves.

/// Top-level error for the walkthrough binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum TourError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// A database operation failed.
    #[error("database error: {source}")]
    Db {
        /// The underlying data layer error.
        #[from]
        source: jobboard_db::DbError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// A row the walkthrough inserted earlier was missing.
    #[error("walkthrough expected {what} to exist")]
    Missing {
        /// What was looked up.
        what: String,
    },
}
