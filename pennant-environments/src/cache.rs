//! Environment Cache
//!
//! TTL read-through cache serving environment lookups by public API key with
//! bounded staleness.

use crate::environment::Environment;
use crate::error::{EnvironmentError, EnvironmentResult};
use crate::store::EnvironmentStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default staleness bound for cached environments.
///
/// A staleness/throughput trade-off, not a law; override with
/// [`EnvironmentCache::with_ttl`]. There is no invalidation push path, so
/// the TTL is the only bound on staleness.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct CacheEntry {
    environment: Environment,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Read-through cache keyed by environment API key.
///
/// Entries are immutable snapshots: a hit within the TTL returns the cached
/// snapshot unchanged, and no entry is ever mutated in place. The store
/// fetch on a miss happens outside the lock, so concurrent misses for the
/// same key each hit the store independently and the last write wins; both
/// writes carry equal data from the same source of truth, so the only cost
/// is a redundant store read. Per-key mutual exclusion around the miss path
/// would remove that cost if it ever matters.
///
/// Construct one per store and inject it wherever environment lookups are
/// needed; [`EnvironmentCache::reset`] gives tests a clean slate.
pub struct EnvironmentCache<S: EnvironmentStore> {
    store: Arc<S>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<S: EnvironmentStore> EnvironmentCache<S> {
    /// Create a cache with the default TTL.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    /// Create a cache with an explicit TTL.
    pub fn with_ttl(store: Arc<S>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The configured staleness bound.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up an environment by API key, reading through to the store on a
    /// miss or an expired entry.
    ///
    /// A key the store does not know is never cached — a cache entry implies
    /// "found" — so a later store-side creation of that key becomes visible
    /// on the next lookup without waiting out any TTL. The resulting
    /// [`EnvironmentError::NotFound`] is distinct from a transient
    /// [`EnvironmentError::Store`] failure.
    pub async fn get_by_key(&self, api_key: &str) -> EnvironmentResult<Environment> {
        if let Some(environment) = self.lookup(api_key) {
            debug!("environment cache hit for api_key {}", api_key);
            return Ok(environment);
        }

        match self.store.find_by_api_key(api_key).await? {
            Some(environment) => {
                self.insert(environment.clone());
                debug!("environment cache populated for api_key {}", api_key);
                Ok(environment)
            }
            None => {
                info!("environment with api_key {} does not exist", api_key);
                Err(EnvironmentError::NotFound(api_key.to_string()))
            }
        }
    }

    /// Drop every cached entry. Intended for test isolation and operational
    /// resets.
    pub fn reset(&self) {
        self.entries.write().clear();
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.read().values().filter(|e| e.is_live(now)).count()
    }

    /// Whether the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, api_key: &str) -> Option<Environment> {
        let entries = self.entries.read();
        entries
            .get(api_key)
            .filter(|e| e.is_live(Instant::now()))
            .map(|e| e.environment.clone())
    }

    fn insert(&self, environment: Environment) {
        let key = environment.api_key.clone();
        let entry = CacheEntry {
            environment,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(key, entry);
    }
}
