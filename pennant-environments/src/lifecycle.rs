//! Environment Lifecycle
//!
//! Creating environments with seeded default feature states, and cloning an
//! environment's non-identity configuration under a new key.

use crate::environment::{Environment, Project};
use crate::error::{EnvironmentError, EnvironmentResult};
use crate::store::{EnvironmentStore, IdentityFilter, NewEnvironment, NewFeatureState};
use pennant_features::{FeatureState, Scope};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Generate a fresh opaque API key.
pub fn generate_api_key() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// Request to create a new environment.
#[derive(Debug, Clone)]
pub struct CreateEnvironmentRequest {
    /// Environment name
    pub name: String,

    /// Owning project (joined snapshot)
    pub project: Project,

    /// Explicit API key; a fresh one is generated when absent
    pub api_key: Option<String>,
}

impl CreateEnvironmentRequest {
    /// Create a request with a generated API key.
    pub fn new(name: impl Into<String>, project: Project) -> Self {
        Self {
            name: name.into(),
            project,
            api_key: None,
        }
    }

    /// Supply an explicit API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Environment lifecycle operations over an injected store.
pub struct EnvironmentManager<S: EnvironmentStore> {
    store: Arc<S>,
}

impl<S: EnvironmentStore> EnvironmentManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an environment and seed its default feature states.
    ///
    /// Seeding runs explicitly in this call path, exactly once per created
    /// environment; there is no implicit after-save hook. A supplied API key
    /// is validated for uniqueness before any write.
    pub async fn create(
        &self,
        request: CreateEnvironmentRequest,
    ) -> EnvironmentResult<Environment> {
        let api_key = self.claim_api_key(request.api_key).await?;
        let environment = self
            .store
            .create_environment(NewEnvironment {
                name: request.name,
                api_key,
                project: request.project,
            })
            .await?;

        self.seed_defaults(&environment).await?;
        info!(
            "created environment {} ({})",
            environment.name, environment.id
        );
        Ok(environment)
    }

    /// Create one environment-default feature state per project feature,
    /// mirroring each feature's `default_enabled`.
    ///
    /// Not idempotent: a second call would duplicate default states and
    /// trip the store's one-state-per-scope constraint. Call exactly once,
    /// immediately after the environment row is durably created.
    pub async fn seed_defaults(
        &self,
        environment: &Environment,
    ) -> EnvironmentResult<Vec<FeatureState>> {
        let features = self.store.list_features(&environment.project.id).await?;

        let mut states = Vec::with_capacity(features.len());
        for feature in features {
            let state = self
                .store
                .create_feature_state(NewFeatureState {
                    feature_id: feature.id,
                    environment_id: environment.id.clone(),
                    scope: Scope::environment_default(),
                    enabled: feature.default_enabled,
                    value: feature.initial_value,
                })
                .await?;
            states.push(state);
        }

        debug!(
            "seeded {} default feature states for environment {}",
            states.len(),
            environment.id
        );
        Ok(states)
    }

    /// Clone `source` under a new name and key.
    ///
    /// Copies every segment (via the segment's own clone operation) and
    /// every non-identity feature state, re-pointing segment-scoped states
    /// at the cloned segments. Identity-scoped states stay with the source
    /// environment, and no seeding runs: the clone holds exactly what was
    /// copied.
    ///
    /// The three write phases (environment row, segments, states) are not
    /// wrapped in a store transaction. A failure after the row insert
    /// surfaces as [`EnvironmentError::CloneFailure`] naming the partial
    /// environment so the caller can retry or delete it.
    pub async fn clone_environment(
        &self,
        source: &Environment,
        name: impl Into<String>,
        api_key: Option<String>,
    ) -> EnvironmentResult<Environment> {
        let api_key = self.claim_api_key(api_key).await?;
        let clone = self
            .store
            .create_environment(NewEnvironment {
                name: name.into(),
                api_key,
                project: source.project.clone(),
            })
            .await?;

        match self.copy_configuration(source, &clone).await {
            Ok(copied) => {
                info!(
                    "cloned environment {} into {} ({} feature states)",
                    source.id, clone.id, copied
                );
                Ok(clone)
            }
            Err(err) => {
                warn!(
                    "clone of environment {} left partial environment {}: {}",
                    source.id, clone.id, err
                );
                Err(EnvironmentError::CloneFailure {
                    source_id: source.id.clone(),
                    partial_id: clone.id.clone(),
                    reason: err.to_string(),
                })
            }
        }
    }

    async fn copy_configuration(
        &self,
        source: &Environment,
        clone: &Environment,
    ) -> EnvironmentResult<usize> {
        let mut cloned_segments = HashMap::new();
        for segment in self.store.list_feature_segments(&source.id).await? {
            let cloned = self.store.clone_segment(&segment, &clone.id).await?;
            cloned_segments.insert(segment.id, cloned.id);
        }

        // Identities are tied to the source environment; only non-identity
        // states carry over.
        let states = self
            .store
            .list_feature_states(&source.id, IdentityFilter::NonIdentity)
            .await?;

        let copied = states.len();
        for state in states {
            let feature_segment = match state.scope.feature_segment.as_ref() {
                Some(segment_id) => Some(
                    cloned_segments
                        .get(segment_id)
                        .cloned()
                        .ok_or_else(|| {
                            crate::error::StoreError::Query(format!(
                                "state {} references segment {} not owned by environment {}",
                                state.id, segment_id, source.id
                            ))
                        })?,
                ),
                None => None,
            };

            self.store
                .create_feature_state(NewFeatureState {
                    feature_id: state.feature_id,
                    environment_id: clone.id.clone(),
                    scope: Scope {
                        feature_segment,
                        identity: None,
                    },
                    enabled: state.enabled,
                    value: state.value,
                })
                .await?;
        }

        Ok(copied)
    }

    async fn claim_api_key(&self, api_key: Option<String>) -> EnvironmentResult<String> {
        match api_key {
            Some(key) => {
                if self.store.api_key_in_use(&key).await? {
                    return Err(EnvironmentError::DuplicateApiKey(key));
                }
                Ok(key)
            }
            None => Ok(generate_api_key()),
        }
    }
}
