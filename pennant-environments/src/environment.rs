//! Environment Context
//!
//! A deployment context under a project, identified by a unique public API
//! key, holding its own set of feature overrides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organisation owning a project. Referenced, not managed here; joined onto
/// the cached environment snapshot so resolution needs no extra round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    /// Store-assigned identifier
    pub id: String,

    /// Organisation name
    pub name: String,
}

impl Organisation {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Project owning a set of features and environments. Referenced, not
/// managed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier
    pub id: String,

    /// Project name
    pub name: String,

    /// Owning organisation
    pub organisation: Organisation,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organisation: Organisation,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            organisation,
        }
    }
}

/// A deployment context under a project.
///
/// The `project` field is an eagerly-joined snapshot taken at store-read
/// time, so cached environments carry everything resolution needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Store-assigned identifier
    pub id: String,

    /// Environment name
    pub name: String,

    /// Globally unique public API key
    pub api_key: String,

    /// Owning project, with organisation joined
    pub project: Project,

    /// Creation timestamp
    pub created_date: DateTime<Utc>,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project {} - Environment {}", self.project.name, self.name)
    }
}

/// External-facing notification target on an environment. Inert data;
/// delivery belongs to the surrounding system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    /// Store-assigned identifier
    pub id: String,

    /// Owning environment
    pub environment_id: String,

    /// Delivery URL
    pub url: String,

    /// Whether the webhook fires
    pub enabled: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Create a new enabled webhook.
    pub fn new(
        id: impl Into<String>,
        environment_id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            url: url.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the enabled state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
