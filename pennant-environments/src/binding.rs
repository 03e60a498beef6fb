//! Request Binding
//!
//! Extracts the environment key from an inbound request header and resolves
//! it through the environment cache.

use crate::cache::EnvironmentCache;
use crate::environment::Environment;
use crate::error::{EnvironmentError, EnvironmentResult};
use crate::store::EnvironmentStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Header carrying the environment's public API key.
///
/// Lowercased; the surrounding HTTP layer is expected to normalize header
/// names before handing them over.
pub const ENVIRONMENT_KEY_HEADER: &str = "x-environment-key";

/// Extract the environment key from request headers.
///
/// A missing header is a malformed-request condition
/// ([`EnvironmentError::HeaderMissing`]), distinct from a well-formed key
/// the store cannot resolve.
pub fn extract_environment_key(headers: &HashMap<String, String>) -> EnvironmentResult<&str> {
    headers
        .get(ENVIRONMENT_KEY_HEADER)
        .map(String::as_str)
        .ok_or_else(|| EnvironmentError::HeaderMissing(ENVIRONMENT_KEY_HEADER.to_string()))
}

/// Resolves environments from request headers via a shared cache.
///
/// Performs no store access of its own; the cache's read-through path is the
/// only suspension point.
pub struct HeaderEnvironmentResolver<S: EnvironmentStore> {
    cache: Arc<EnvironmentCache<S>>,
}

impl<S: EnvironmentStore> HeaderEnvironmentResolver<S> {
    pub fn new(cache: Arc<EnvironmentCache<S>>) -> Self {
        Self { cache }
    }

    /// Extract the key header and resolve it to an environment.
    pub async fn resolve(
        &self,
        headers: &HashMap<String, String>,
    ) -> EnvironmentResult<Environment> {
        let api_key = extract_environment_key(headers)?;
        self.cache.get_by_key(api_key).await
    }
}
