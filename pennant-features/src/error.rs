//! Error types for feature state resolution.

use thiserror::Error;

/// Result type for feature state operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Feature state resolution errors.
///
/// Both variants are faults rather than user errors: every feature is
/// expected to carry exactly one state per scope in a well-formed
/// environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    /// No state matched; seeding was skipped or a clone was partial
    #[error("No feature state for feature {feature_id} ({scope})")]
    StateNotFound { feature_id: String, scope: String },

    /// More than one state matched; the store's one-state-per-scope
    /// constraint was violated
    #[error("{count} feature states match feature {feature_id} ({scope}); expected exactly one")]
    DuplicateState {
        feature_id: String,
        scope: String,
        count: usize,
    },
}
