//! Error types for the ranking service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Ratings did not converge after {sweeps} sweeps")]
    NotConverged { sweeps: usize },

    #[error("Invalid schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error("Rating storage failed: {message}")]
    StorageError { message: String },

    #[error("Failed to publish rankings: {message}")]
    PublishError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
