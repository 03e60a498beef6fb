//! Integration tests for pennant-environments
//!
//! Exercises the full path: header binding -> cached key resolution ->
//! lifecycle -> feature state resolution.

use async_trait::async_trait;
use pennant_environments::prelude::*;
use pennant_features::{resolver, Feature, FeatureSegment, FeatureState, Scope};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn project() -> Project {
    Project::new("p1", "P1", Organisation::new("org-1", "Acme"))
}

fn store_with_dark_mode() -> Arc<InMemoryEnvironmentStore> {
    let store = Arc::new(InMemoryEnvironmentStore::new());
    store.add_feature(Feature::new("dark-mode", "p1", "dark_mode").with_default_enabled(true));
    store
}

#[tokio::test]
async fn test_create_resolve_clone_scenario() {
    let store = store_with_dark_mode();
    let manager = EnvironmentManager::new(store.clone());

    // Creating Prod under P1 seeds dark_mode's default state.
    let prod = manager
        .create(CreateEnvironmentRequest::new("Prod", project()).with_api_key("abc123"))
        .await
        .unwrap();
    assert_eq!(prod.api_key, "abc123");

    let prod_states = store
        .list_feature_states(&prod.id, IdentityFilter::All)
        .await
        .unwrap();
    let prod_state = resolver::resolve_default(&prod_states, "dark-mode").unwrap();
    assert!(prod_state.enabled);
    assert!(prod_state.scope.is_environment_default());
    assert_eq!(prod_state.environment_id, prod.id);

    // Cloning Prod into Staging carries the state under a fresh id.
    let staging = manager
        .clone_environment(&prod, "Staging", Some("def456".to_string()))
        .await
        .unwrap();
    assert_eq!(staging.api_key, "def456");
    assert_eq!(staging.project, prod.project);

    let staging_states = store
        .list_feature_states(&staging.id, IdentityFilter::All)
        .await
        .unwrap();
    let staging_state = resolver::resolve_default(&staging_states, "dark-mode").unwrap();
    assert!(staging_state.enabled);
    assert_ne!(staging_state.id, prod_state.id);
    assert_eq!(staging_state.environment_id, staging.id);
}

#[tokio::test]
async fn test_request_to_feature_state_path() {
    let store = store_with_dark_mode();
    let manager = EnvironmentManager::new(store.clone());
    manager
        .create(CreateEnvironmentRequest::new("Prod", project()).with_api_key("abc123"))
        .await
        .unwrap();

    let cache = Arc::new(EnvironmentCache::new(store.clone()));
    let request_resolver = HeaderEnvironmentResolver::new(cache);

    let mut headers = HashMap::new();
    headers.insert(ENVIRONMENT_KEY_HEADER.to_string(), "abc123".to_string());

    let environment = request_resolver.resolve(&headers).await.unwrap();
    assert_eq!(environment.to_string(), "Project P1 - Environment Prod");

    let states = store
        .list_feature_states(&environment.id, IdentityFilter::All)
        .await
        .unwrap();
    assert!(resolver::resolve_default(&states, "dark-mode").unwrap().enabled);
}

#[tokio::test]
async fn test_clone_counts_identity_vs_non_identity() {
    let store = store_with_dark_mode();
    store.add_feature(Feature::new("beta-api", "p1", "beta_api"));
    let manager = EnvironmentManager::new(store.clone());

    let source = manager
        .create(CreateEnvironmentRequest::new("Prod", project()))
        .await
        .unwrap();
    store.add_segment(FeatureSegment::new("seg-1", source.id.clone(), "beta"));
    store
        .create_feature_state(NewFeatureState {
            feature_id: "beta-api".to_string(),
            environment_id: source.id.clone(),
            scope: Scope::for_segment("seg-1"),
            enabled: true,
            value: None,
        })
        .await
        .unwrap();
    for identity in ["user-1", "user-2", "user-3"] {
        store
            .create_feature_state(NewFeatureState {
                feature_id: "dark-mode".to_string(),
                environment_id: source.id.clone(),
                scope: Scope::for_identity(identity),
                enabled: false,
                value: None,
            })
            .await
            .unwrap();
    }

    // Source: 2 seeded defaults + 1 segment state + 3 identity states.
    // Clone: exactly the 3 non-identity states, none identity-scoped.
    let clone = manager
        .clone_environment(&source, "Staging", None)
        .await
        .unwrap();

    let cloned = store
        .list_feature_states(&clone.id, IdentityFilter::All)
        .await
        .unwrap();
    assert_eq!(cloned.len(), 3);
    assert!(cloned.iter().all(|s| s.scope.identity.is_none()));
}

/// Store whose feature-state writes start failing after a budget, to drive
/// the partial-clone failure path.
struct FlakyStore {
    inner: Arc<InMemoryEnvironmentStore>,
    state_writes_left: AtomicUsize,
}

impl FlakyStore {
    fn new(inner: Arc<InMemoryEnvironmentStore>, budget: usize) -> Self {
        Self {
            inner,
            state_writes_left: AtomicUsize::new(budget),
        }
    }
}

#[async_trait]
impl EnvironmentStore for FlakyStore {
    async fn find_by_api_key(&self, api_key: &str) -> StoreResult<Option<Environment>> {
        self.inner.find_by_api_key(api_key).await
    }

    async fn api_key_in_use(&self, api_key: &str) -> StoreResult<bool> {
        self.inner.api_key_in_use(api_key).await
    }

    async fn list_features(&self, project_id: &str) -> StoreResult<Vec<Feature>> {
        self.inner.list_features(project_id).await
    }

    async fn list_feature_states(
        &self,
        environment_id: &str,
        filter: IdentityFilter,
    ) -> StoreResult<Vec<FeatureState>> {
        self.inner.list_feature_states(environment_id, filter).await
    }

    async fn list_feature_segments(
        &self,
        environment_id: &str,
    ) -> StoreResult<Vec<FeatureSegment>> {
        self.inner.list_feature_segments(environment_id).await
    }

    async fn create_environment(&self, new: NewEnvironment) -> StoreResult<Environment> {
        self.inner.create_environment(new).await
    }

    async fn create_feature_state(&self, new: NewFeatureState) -> StoreResult<FeatureState> {
        if self.state_writes_left.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
            left.checked_sub(1)
        })
        .is_err()
        {
            return Err(StoreError::Unavailable("write budget exhausted".to_string()));
        }
        self.inner.create_feature_state(new).await
    }

    async fn clone_segment(
        &self,
        segment: &FeatureSegment,
        target_environment_id: &str,
    ) -> StoreResult<FeatureSegment> {
        self.inner.clone_segment(segment, target_environment_id).await
    }
}

#[tokio::test]
async fn test_partial_clone_reports_clone_failure_with_partial_id() {
    let inner = store_with_dark_mode();
    inner.add_feature(Feature::new("beta-api", "p1", "beta_api"));

    let seeded_manager = EnvironmentManager::new(inner.clone());
    let source = seeded_manager
        .create(CreateEnvironmentRequest::new("Prod", project()))
        .await
        .unwrap();

    // Allow the clone's first state write, fail the second.
    let flaky = Arc::new(FlakyStore::new(inner.clone(), 1));
    let manager = EnvironmentManager::new(flaky);

    let err = manager
        .clone_environment(&source, "Staging", Some("def456".to_string()))
        .await
        .unwrap_err();

    let EnvironmentError::CloneFailure {
        source_id,
        partial_id,
        ..
    } = err
    else {
        panic!("expected CloneFailure, got {err}");
    };
    assert_eq!(source_id, source.id);

    // The partial environment row exists and is detectable by the caller.
    let partial = inner.find_by_api_key("def456").await.unwrap().unwrap();
    assert_eq!(partial.id, partial_id);
    let partial_states = inner
        .list_feature_states(&partial_id, IdentityFilter::All)
        .await
        .unwrap();
    assert_eq!(partial_states.len(), 1);
}

#[tokio::test]
async fn test_resolver_miss_is_fault_not_default() {
    let store = store_with_dark_mode();
    let manager = EnvironmentManager::new(store.clone());
    let environment = manager
        .create(CreateEnvironmentRequest::new("Prod", project()))
        .await
        .unwrap();

    let states = store
        .list_feature_states(&environment.id, IdentityFilter::All)
        .await
        .unwrap();
    let err = resolver::resolve_default(&states, "unknown-feature").unwrap_err();
    assert!(matches!(
        err,
        pennant_features::FeatureError::StateNotFound { .. }
    ));
}
