//! Environment Store Contract
//!
//! The persistence interface the core consumes. Implement with your database
//! of choice; an in-memory implementation ships for tests and examples.
//!
//! The store owns the uniqueness constraints the core relies on: one API key
//! per environment and one feature state per (environment, feature, scope).

use crate::environment::{Environment, Project};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use pennant_features::{Feature, FeatureSegment, FeatureState, FeatureValue, Scope};
use uuid::Uuid;

/// Filter over the identity component of a feature state scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityFilter {
    /// All states regardless of identity
    All,
    /// Only states with no identity: environment-default and segment-scoped
    NonIdentity,
}

impl IdentityFilter {
    fn accepts(self, scope: &Scope) -> bool {
        match self {
            Self::All => true,
            Self::NonIdentity => !scope.has_identity(),
        }
    }
}

/// Fields for creating an environment row.
#[derive(Debug, Clone)]
pub struct NewEnvironment {
    pub name: String,
    pub api_key: String,
    pub project: Project,
}

/// Fields for creating a feature state row.
#[derive(Debug, Clone)]
pub struct NewFeatureState {
    pub feature_id: String,
    pub environment_id: String,
    pub scope: Scope,
    pub enabled: bool,
    pub value: Option<FeatureValue>,
}

/// Store contract consumed by the cache and lifecycle.
///
/// Reads return eagerly-joined snapshots; `find_by_api_key` carries the
/// project and organisation so resolution needs no further round trips.
#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    /// Find an environment by its public API key.
    async fn find_by_api_key(&self, api_key: &str) -> StoreResult<Option<Environment>>;

    /// Whether any environment holds this API key.
    async fn api_key_in_use(&self, api_key: &str) -> StoreResult<bool>;

    /// List the features belonging to a project.
    async fn list_features(&self, project_id: &str) -> StoreResult<Vec<Feature>>;

    /// List an environment's feature states, filtered on identity.
    async fn list_feature_states(
        &self,
        environment_id: &str,
        filter: IdentityFilter,
    ) -> StoreResult<Vec<FeatureState>>;

    /// List the segments owned by an environment.
    async fn list_feature_segments(&self, environment_id: &str)
    -> StoreResult<Vec<FeatureSegment>>;

    /// Create an environment row. Fails with [`StoreError::Conflict`] on a
    /// duplicate API key.
    async fn create_environment(&self, new: NewEnvironment) -> StoreResult<Environment>;

    /// Create a feature state row. Fails with [`StoreError::Conflict`] if a
    /// state already exists for the same (environment, feature, scope).
    async fn create_feature_state(&self, new: NewFeatureState) -> StoreResult<FeatureState>;

    /// Clone a segment under a target environment (the segment's own clone
    /// operation; rule internals belong to the store).
    async fn clone_segment(
        &self,
        segment: &FeatureSegment,
        target_environment_id: &str,
    ) -> StoreResult<FeatureSegment>;
}

#[derive(Debug, Default)]
struct StoreInner {
    environments: Vec<Environment>,
    features: Vec<Feature>,
    states: Vec<FeatureState>,
    segments: Vec<FeatureSegment>,
}

/// In-memory environment store for tests and examples.
///
/// Enforces the same uniqueness constraints a production store would carry
/// as database constraints.
#[derive(Debug, Default)]
pub struct InMemoryEnvironmentStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryEnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project feature. Feature CRUD is out of core scope; this
    /// is fixture plumbing.
    pub fn add_feature(&self, feature: Feature) {
        self.inner.write().features.push(feature);
    }

    /// Register a segment under an environment. Segment CRUD is out of core
    /// scope; this is fixture plumbing.
    pub fn add_segment(&self, segment: FeatureSegment) {
        self.inner.write().segments.push(segment);
    }

    fn fresh_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl EnvironmentStore for InMemoryEnvironmentStore {
    async fn find_by_api_key(&self, api_key: &str) -> StoreResult<Option<Environment>> {
        let inner = self.inner.read();
        Ok(inner
            .environments
            .iter()
            .find(|e| e.api_key == api_key)
            .cloned())
    }

    async fn api_key_in_use(&self, api_key: &str) -> StoreResult<bool> {
        let inner = self.inner.read();
        Ok(inner.environments.iter().any(|e| e.api_key == api_key))
    }

    async fn list_features(&self, project_id: &str) -> StoreResult<Vec<Feature>> {
        let inner = self.inner.read();
        Ok(inner
            .features
            .iter()
            .filter(|f| f.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_feature_states(
        &self,
        environment_id: &str,
        filter: IdentityFilter,
    ) -> StoreResult<Vec<FeatureState>> {
        let inner = self.inner.read();
        Ok(inner
            .states
            .iter()
            .filter(|s| s.environment_id == environment_id && filter.accepts(&s.scope))
            .cloned()
            .collect())
    }

    async fn list_feature_segments(
        &self,
        environment_id: &str,
    ) -> StoreResult<Vec<FeatureSegment>> {
        let inner = self.inner.read();
        Ok(inner
            .segments
            .iter()
            .filter(|s| s.environment_id == environment_id)
            .cloned()
            .collect())
    }

    async fn create_environment(&self, new: NewEnvironment) -> StoreResult<Environment> {
        let mut inner = self.inner.write();
        if inner.environments.iter().any(|e| e.api_key == new.api_key) {
            return Err(StoreError::Conflict(format!(
                "api_key {} already exists",
                new.api_key
            )));
        }

        let environment = Environment {
            id: Self::fresh_id(),
            name: new.name,
            api_key: new.api_key,
            project: new.project,
            created_date: Utc::now(),
        };
        inner.environments.push(environment.clone());
        Ok(environment)
    }

    async fn create_feature_state(&self, new: NewFeatureState) -> StoreResult<FeatureState> {
        let mut inner = self.inner.write();
        let duplicate = inner.states.iter().any(|s| {
            s.environment_id == new.environment_id
                && s.feature_id == new.feature_id
                && s.scope == new.scope
        });
        if duplicate {
            return Err(StoreError::Conflict(format!(
                "feature state already exists for feature {} ({}) in environment {}",
                new.feature_id, new.scope, new.environment_id
            )));
        }

        let state = FeatureState {
            id: Self::fresh_id(),
            feature_id: new.feature_id,
            environment_id: new.environment_id,
            scope: new.scope,
            enabled: new.enabled,
            value: new.value,
        };
        inner.states.push(state.clone());
        Ok(state)
    }

    async fn clone_segment(
        &self,
        segment: &FeatureSegment,
        target_environment_id: &str,
    ) -> StoreResult<FeatureSegment> {
        let cloned = FeatureSegment::new(Self::fresh_id(), target_environment_id, &segment.name)
            .with_priority(segment.priority);
        self.inner.write().segments.push(cloned.clone());
        Ok(cloned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Organisation;

    fn fixture_project() -> Project {
        Project::new("proj-1", "Flags", Organisation::new("org-1", "Acme"))
    }

    #[tokio::test]
    async fn test_create_and_find_by_api_key() {
        let store = InMemoryEnvironmentStore::new();
        let created = store
            .create_environment(NewEnvironment {
                name: "Production".to_string(),
                api_key: "abc123".to_string(),
                project: fixture_project(),
            })
            .await
            .unwrap();

        let found = store.find_by_api_key("abc123").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(store.find_by_api_key("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_api_key_conflicts() {
        let store = InMemoryEnvironmentStore::new();
        let new = NewEnvironment {
            name: "Production".to_string(),
            api_key: "abc123".to_string(),
            project: fixture_project(),
        };
        store.create_environment(new.clone()).await.unwrap();

        let err = store.create_environment(new).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_one_state_per_scope_enforced_at_write_time() {
        let store = InMemoryEnvironmentStore::new();
        let new = NewFeatureState {
            feature_id: "feat-1".to_string(),
            environment_id: "env-1".to_string(),
            scope: Scope::environment_default(),
            enabled: true,
            value: None,
        };
        store.create_feature_state(new.clone()).await.unwrap();

        let err = store.create_feature_state(new.clone()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The same feature in a narrower scope is a different row.
        let segment_scoped = NewFeatureState {
            scope: Scope::for_segment("seg-1"),
            ..new
        };
        store.create_feature_state(segment_scoped).await.unwrap();
    }

    #[tokio::test]
    async fn test_identity_filter() {
        let store = InMemoryEnvironmentStore::new();
        for scope in [
            Scope::environment_default(),
            Scope::for_segment("seg-1"),
            Scope::for_identity("id-1"),
        ] {
            store
                .create_feature_state(NewFeatureState {
                    feature_id: "feat-1".to_string(),
                    environment_id: "env-1".to_string(),
                    scope,
                    enabled: false,
                    value: None,
                })
                .await
                .unwrap();
        }

        let all = store
            .list_feature_states("env-1", IdentityFilter::All)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let non_identity = store
            .list_feature_states("env-1", IdentityFilter::NonIdentity)
            .await
            .unwrap();
        assert_eq!(non_identity.len(), 2);
        assert!(non_identity.iter().all(|s| s.scope.identity.is_none()));
    }

    #[tokio::test]
    async fn test_clone_segment_points_at_target() {
        let store = InMemoryEnvironmentStore::new();
        let segment = FeatureSegment::new("seg-1", "env-1", "beta").with_priority(3);
        store.add_segment(segment.clone());

        let cloned = store.clone_segment(&segment, "env-2").await.unwrap();
        assert_ne!(cloned.id, segment.id);
        assert_eq!(cloned.environment_id, "env-2");
        assert_eq!(cloned.name, "beta");
        assert_eq!(cloned.priority, 3);

        let listed = store.list_feature_segments("env-2").await.unwrap();
        assert_eq!(listed, vec![cloned]);
    }
}
