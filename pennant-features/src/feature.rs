//! Project-Level Features
//!
//! A feature is a togglable capability defined at the project level with a
//! project-wide default enabled state. Per-environment overrides live in
//! [`FeatureState`](crate::state::FeatureState).

use crate::state::FeatureValue;
use serde::{Deserialize, Serialize};

/// A togglable capability defined at the project level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Store-assigned identifier
    pub id: String,

    /// Owning project
    pub project_id: String,

    /// Feature name/key
    pub name: String,

    /// Project-wide default, mirrored into every environment-default
    /// feature state at seed time
    pub default_enabled: bool,

    /// Optional value seeded alongside the default state
    pub initial_value: Option<FeatureValue>,
}

impl Feature {
    /// Create a new feature, disabled by default.
    ///
    /// # Examples
    ///
    /// ```
    /// use pennant_features::Feature;
    ///
    /// let feature = Feature::new("feat-1", "project-1", "dark_mode");
    /// assert!(!feature.default_enabled);
    /// ```
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
            default_enabled: false,
            initial_value: None,
        }
    }

    /// Set the project-wide default enabled state.
    pub fn with_default_enabled(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    /// Set the initial value.
    pub fn with_initial_value(mut self, value: FeatureValue) -> Self {
        self.initial_value = Some(value);
        self
    }
}
