//! Environments for Pennant
//!
//! Deployment contexts under a project, each identified by a unique public
//! API key and holding its own set of feature overrides. This crate carries
//! the read-through environment cache, the environment lifecycle (creation
//! with seeded defaults, cloning), and header-based request binding.
//!
//! # Features
//!
//! - **Read-Through Cache** - TTL-bounded environment lookups by API key
//! - **Lifecycle** - Explicit default-state seeding and non-identity cloning
//! - **Request Binding** - `x-environment-key` header extraction
//! - **Store Contract** - Bring your own database; in-memory store included
//!
//! # Quick Start
//!
//! ```
//! use pennant_environments::prelude::*;
//! use pennant_features::{resolver, Feature};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), EnvironmentError> {
//! // Store (in-memory here; implement `EnvironmentStore` for your database)
//! let store = Arc::new(InMemoryEnvironmentStore::new());
//! let project = Project::new("proj-1", "Flags", Organisation::new("org-1", "Acme"));
//! store.add_feature(Feature::new("feat-1", "proj-1", "dark_mode").with_default_enabled(true));
//!
//! // Create an environment; default feature states are seeded explicitly
//! let manager = EnvironmentManager::new(store.clone());
//! let environment = manager
//!     .create(CreateEnvironmentRequest::new("Production", project).with_api_key("abc123"))
//!     .await?;
//!
//! // Resolve requests through the shared cache
//! let cache = Arc::new(EnvironmentCache::new(store.clone()));
//! let resolver_svc = HeaderEnvironmentResolver::new(cache);
//!
//! let mut headers = HashMap::new();
//! headers.insert(ENVIRONMENT_KEY_HEADER.to_string(), "abc123".to_string());
//! let resolved = resolver_svc.resolve(&headers).await?;
//!
//! // Feature state resolution over the environment's materialized states
//! let states = store
//!     .list_feature_states(&resolved.id, IdentityFilter::All)
//!     .await?;
//! let state = resolver::resolve_default(&states, "feat-1").unwrap();
//! assert!(state.enabled);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod cache;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use binding::{ENVIRONMENT_KEY_HEADER, HeaderEnvironmentResolver, extract_environment_key};
pub use cache::{DEFAULT_TTL, EnvironmentCache};
pub use environment::{Environment, Organisation, Project, Webhook};
pub use error::{EnvironmentError, EnvironmentResult, StoreError, StoreResult};
pub use lifecycle::{CreateEnvironmentRequest, EnvironmentManager, generate_api_key};
pub use store::{
    EnvironmentStore, IdentityFilter, InMemoryEnvironmentStore, NewEnvironment, NewFeatureState,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binding::{
        ENVIRONMENT_KEY_HEADER, HeaderEnvironmentResolver, extract_environment_key,
    };
    pub use crate::cache::{DEFAULT_TTL, EnvironmentCache};
    pub use crate::environment::{Environment, Organisation, Project, Webhook};
    pub use crate::error::{EnvironmentError, EnvironmentResult, StoreError, StoreResult};
    pub use crate::lifecycle::{CreateEnvironmentRequest, EnvironmentManager, generate_api_key};
    pub use crate::store::{
        EnvironmentStore, IdentityFilter, InMemoryEnvironmentStore, NewEnvironment,
        NewFeatureState,
    };
}
