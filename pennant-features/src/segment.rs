//! Feature Segments
//!
//! A segment is a named grouping of identities sharing an override within an
//! environment. Membership rules and evaluation belong to the store layer;
//! the core only carries the segment reference and consumes its
//! clone-to-target operation.

use serde::{Deserialize, Serialize};

/// Segment-level override grouping, owned by an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSegment {
    /// Store-assigned identifier
    pub id: String,

    /// Owning environment
    pub environment_id: String,

    /// Segment name
    pub name: String,

    /// Evaluation priority among the environment's segments
    pub priority: u32,
}

impl FeatureSegment {
    /// Create a new segment with priority 0.
    pub fn new(
        id: impl Into<String>,
        environment_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            environment_id: environment_id.into(),
            name: name.into(),
            priority: 0,
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}
