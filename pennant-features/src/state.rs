//! Feature State
//!
//! The enabled/config value of one feature within one environment, optionally
//! narrowed to a segment and/or an identity by its [`Scope`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FeatureValue {
    pub fn boolean(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The `(feature_segment, identity)` pair that selects which feature state
/// applies.
///
/// `(None, None)` is the environment-level default scope. It is a named
/// value, not a call-site convention: use [`Scope::environment_default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Segment-level override grouping; `None` means environment scope
    pub feature_segment: Option<String>,

    /// End-user or device reference; `None` means non-identity scope
    pub identity: Option<String>,
}

impl Scope {
    /// The environment-level default scope: no segment, no identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use pennant_features::Scope;
    ///
    /// let scope = Scope::environment_default();
    /// assert!(scope.is_environment_default());
    /// ```
    pub fn environment_default() -> Self {
        Self {
            feature_segment: None,
            identity: None,
        }
    }

    /// Scope narrowed to a segment.
    pub fn for_segment(segment_id: impl Into<String>) -> Self {
        Self {
            feature_segment: Some(segment_id.into()),
            identity: None,
        }
    }

    /// Scope narrowed to an identity.
    pub fn for_identity(identity_id: impl Into<String>) -> Self {
        Self {
            feature_segment: None,
            identity: Some(identity_id.into()),
        }
    }

    /// Whether this is the environment-level default scope.
    pub fn is_environment_default(&self) -> bool {
        self.feature_segment.is_none() && self.identity.is_none()
    }

    /// Whether this scope targets an identity.
    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.feature_segment, &self.identity) {
            (None, None) => write!(f, "environment default"),
            (Some(segment), None) => write!(f, "segment {}", segment),
            (None, Some(identity)) => write!(f, "identity {}", identity),
            (Some(segment), Some(identity)) => {
                write!(f, "segment {} / identity {}", segment, identity)
            }
        }
    }
}

/// The enabled/config value of one feature within one environment.
///
/// Belongs exclusively to its environment; `environment_id` is immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureState {
    /// Store-assigned identifier
    pub id: String,

    /// The feature this state overrides
    pub feature_id: String,

    /// Owning environment
    pub environment_id: String,

    /// Which requests this state applies to
    pub scope: Scope,

    /// Whether the feature is enabled in this scope
    pub enabled: bool,

    /// Feature-specific config value
    pub value: Option<FeatureValue>,
}

impl FeatureState {
    /// Create a new feature state in the environment-default scope,
    /// disabled.
    pub fn new(
        id: impl Into<String>,
        feature_id: impl Into<String>,
        environment_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            feature_id: feature_id.into(),
            environment_id: environment_id.into(),
            scope: Scope::environment_default(),
            enabled: false,
            value: None,
        }
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the config value.
    pub fn with_value(mut self, value: FeatureValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Whether this state applies to `feature_id` within `scope`.
    ///
    /// Scope matching is exact equality on the `(feature_segment, identity)`
    /// pair; a segment-scoped state never answers for the environment
    /// default and vice versa.
    pub fn matches(&self, feature_id: &str, scope: &Scope) -> bool {
        self.scope == *scope && self.feature_id == feature_id
    }
}
