//! Feature Flags for Pennant
//!
//! Features, per-environment feature states, and deterministic resolution of
//! the single override that applies within a scope.
//!
//! # Features
//!
//! - **Typed Values** - Bool, int, float, and string feature values
//! - **Scoped Overrides** - Environment, segment, and identity scopes
//! - **Deterministic Resolution** - Exact-match scope selection, never
//!   "take the first result"
//! - **Integrity Faults** - Missing or duplicated states surface as errors,
//!   never as silent defaults
//!
//! # Quick Start
//!
//! ```
//! use pennant_features::{resolver, FeatureState, FeatureValue, Scope};
//!
//! let states = vec![
//!     FeatureState::new("fs-1", "dark-mode", "env-prod")
//!         .with_enabled(true),
//!     FeatureState::new("fs-2", "dark-mode", "env-prod")
//!         .with_scope(Scope::for_segment("beta-users"))
//!         .with_enabled(false),
//! ];
//!
//! // Environment-level default
//! let state = resolver::resolve_default(&states, "dark-mode").unwrap();
//! assert!(state.enabled);
//!
//! // Segment override
//! let state = resolver::resolve(&states, "dark-mode", &Scope::for_segment("beta-users")).unwrap();
//! assert!(!state.enabled);
//! ```

pub mod error;
pub mod feature;
pub mod resolver;
pub mod segment;
pub mod state;

pub use error::{FeatureError, FeatureResult};
pub use feature::Feature;
pub use resolver::{resolve, resolve_default};
pub use segment::FeatureSegment;
pub use state::{FeatureState, FeatureValue, Scope};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{FeatureError, FeatureResult};
    pub use crate::feature::Feature;
    pub use crate::resolver::{resolve, resolve_default};
    pub use crate::segment::FeatureSegment;
    pub use crate::state::{FeatureState, FeatureValue, Scope};
}
