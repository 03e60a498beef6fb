//! Error types for environment resolution and lifecycle.

use pennant_features::FeatureError;
use thiserror::Error;

/// Result type for environment operations.
pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Store-level failures, as reported by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable or timed out; retryable by the caller
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Read or write failed
    #[error("Query failed: {0}")]
    Query(String),

    /// A store-level uniqueness constraint rejected the write
    #[error("Constraint violated: {0}")]
    Conflict(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Environment resolution and lifecycle errors.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// Malformed request: the environment key header is absent. Distinct
    /// from [`EnvironmentError::NotFound`], which is a well-formed but
    /// unresolvable key.
    #[error("Missing request header: {0}")]
    HeaderMissing(String),

    /// No environment holds this API key (revoked or never issued)
    #[error("Environment not found for api_key: {0}")]
    NotFound(String),

    /// Another environment already holds this API key; reported before any
    /// write occurs
    #[error("API key already in use: {0}")]
    DuplicateApiKey(String),

    /// A clone write failed after the environment row was created, leaving
    /// a partially configured environment the caller must retry or delete
    #[error("Clone of environment {source_id} left partial environment {partial_id}: {reason}")]
    CloneFailure {
        source_id: String,
        partial_id: String,
        reason: String,
    },

    /// Transient or structural store failure, distinct from a definitive
    /// not-found
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Feature state integrity fault
    #[error("Feature state error: {0}")]
    Feature(#[from] FeatureError),
}
