//! Feature State Resolution
//!
//! Deterministic selection of the single feature state that applies to a
//! feature within a scope.

use crate::error::{FeatureError, FeatureResult};
use crate::state::{FeatureState, Scope};

/// Resolve the single feature state matching `feature_id` and `scope`.
///
/// The caller supplies the environment's materialized states; this function
/// performs no store or cache access and always returns immediately.
///
/// Matching is exact equality on the `(feature_segment, identity)` pair,
/// then on the feature id. A well-formed environment holds exactly one match
/// per (feature, scope); zero matches means seeding was skipped or a clone
/// was partial, and more than one means the store's uniqueness constraint
/// was violated. Neither case is defaulted silently.
///
/// # Examples
///
/// ```
/// use pennant_features::{resolver, FeatureState, Scope};
///
/// let states = vec![
///     FeatureState::new("fs-1", "feat-1", "env-1").with_enabled(true),
/// ];
///
/// let state = resolver::resolve(&states, "feat-1", &Scope::environment_default()).unwrap();
/// assert!(state.enabled);
/// ```
pub fn resolve<'a>(
    states: &'a [FeatureState],
    feature_id: &str,
    scope: &Scope,
) -> FeatureResult<&'a FeatureState> {
    let mut matches = states.iter().filter(|state| state.matches(feature_id, scope));

    let first = matches.next().ok_or_else(|| FeatureError::StateNotFound {
        feature_id: feature_id.to_string(),
        scope: scope.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(FeatureError::DuplicateState {
            feature_id: feature_id.to_string(),
            scope: scope.to_string(),
            count: extra + 1,
        });
    }

    Ok(first)
}

/// Resolve against the environment-default scope.
pub fn resolve_default<'a>(
    states: &'a [FeatureState],
    feature_id: &str,
) -> FeatureResult<&'a FeatureState> {
    resolve(states, feature_id, &Scope::environment_default())
}
