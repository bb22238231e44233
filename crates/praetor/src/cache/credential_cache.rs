/*
 *  Copyright 2025-2026 Praetor Project
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Credential Cache Module
//!
//! In-process TTL cache mapping (tenant, court, degree) to the decrypted
//! credential for that combination. The cache is a local, ephemeral
//! optimization: the credential store remains the source of truth, nothing
//! is persisted, and the cache is correctly rebuilt from scratch after a
//! process restart or an explicit [`clear`](CredentialCache::clear).
//!
//! Eviction is lazy — a stale entry is removed by the lookup that finds it
//! expired — so [`evict_expired`](CredentialCache::evict_expired) is periodic
//! maintenance, not a correctness requirement.
//!
//! The batch path ([`hydrate_batch`](CredentialCache::hydrate_batch)) exists
//! because the most common caller needs credentials for dozens of
//! (court, degree) combinations of one tenant; a per-combination query there
//! would be a 48x amplification against the credential store.

use metrics::counter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::credential::{CredentialContext, Degree};
use crate::stores::CredentialStore;

/// Cache key: one (tenant, court, degree) combination.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    tenant_id: Uuid,
    court: String,
    degree: Degree,
}

/// Cached credential with its insertion timestamp.
#[derive(Debug, Clone)]
struct CacheEntry {
    credential: CredentialContext,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Cache occupancy snapshot, observability only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
}

/// In-process TTL credential cache.
///
/// Injected explicitly (typically behind an `Arc`) into the
/// [`CredentialResolver`](crate::resolver::CredentialResolver); there is no
/// process-wide instance. Safe under independent concurrent writers.
pub struct CredentialCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl CredentialCache {
    /// Default entry lifetime.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    /// Creates a cache with a custom TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached credential for the combination, if present and
    /// fresh. A stale entry found by this lookup is evicted as a side
    /// effect and reported as absent. No I/O.
    pub fn lookup(&self, tenant_id: Uuid, court: &str, degree: Degree) -> Option<CredentialContext> {
        let key = CacheKey {
            tenant_id,
            court: court.to_string(),
            degree,
        };

        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(&key) {
            if !entry.is_expired(self.ttl) {
                counter!("praetor.credential_cache.hits").increment(1);
                return Some(entry.credential.clone());
            }
            debug!(
                tenant_id = %tenant_id,
                court = %court,
                degree = %degree,
                "Evicting expired credential cache entry on lookup"
            );
            entries.remove(&key);
            counter!("praetor.credential_cache.evictions").increment(1);
        }

        counter!("praetor.credential_cache.misses").increment(1);
        None
    }

    /// Inserts or overwrites the entry for the credential's combination,
    /// stamped with the current time.
    pub fn store(&self, credential: CredentialContext) {
        let key = CacheKey {
            tenant_id: credential.tenant_id,
            court: credential.court.clone(),
            degree: credential.degree,
        };
        self.entries.write().insert(
            key,
            CacheEntry {
                credential,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Loads many combinations of one tenant with a single bulk query.
    ///
    /// Every combination for which an active credential is found is also
    /// stored, so subsequent point lookups hit the cache; combinations with
    /// no matching credential resolve to `None`. A store failure is
    /// fail-safe, not fail-fatal: the failure is logged and every requested
    /// combination resolves to `None`.
    pub async fn hydrate_batch(
        &self,
        store: &dyn CredentialStore,
        tenant_id: Uuid,
        combinations: &[(String, Degree)],
    ) -> HashMap<(String, Degree), Option<CredentialContext>> {
        let mut resolved: HashMap<(String, Degree), Option<CredentialContext>> =
            combinations.iter().cloned().map(|c| (c, None)).collect();
        if combinations.is_empty() {
            return resolved;
        }

        let mut courts: Vec<String> = combinations.iter().map(|(c, _)| c.clone()).collect();
        courts.sort();
        courts.dedup();
        let mut degrees: Vec<Degree> = combinations.iter().map(|(_, d)| *d).collect();
        degrees.sort_by_key(|d| d.as_str());
        degrees.dedup();

        let found = match store.find_active_batch(tenant_id, &courts, &degrees).await {
            Ok(found) => found,
            Err(error) => {
                warn!(
                    tenant_id = %tenant_id,
                    combinations = combinations.len(),
                    error = %error,
                    "Batch credential hydration failed; resolving all combinations as absent"
                );
                counter!("praetor.credential_cache.hydrate_failures").increment(1);
                return resolved;
            }
        };

        debug!(
            tenant_id = %tenant_id,
            requested = combinations.len(),
            found = found.len(),
            "Hydrated credential cache from batch fetch"
        );

        for credential in found {
            let combination = credential.combination();
            self.store(credential.clone());
            if let Some(slot) = resolved.get_mut(&combination) {
                *slot = Some(credential);
            }
        }

        resolved
    }

    /// Sweeps every entry past TTL and returns how many were removed.
    ///
    /// Intended for periodic background maintenance; lazy eviction on
    /// lookup already guarantees no stale read.
    pub fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(self.ttl));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, "Swept expired credential cache entries");
            counter!("praetor.credential_cache.evictions").increment(removed as u64);
        }
        removed
    }

    /// Drops every entry regardless of age.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Occupancy snapshot.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries
            .values()
            .filter(|entry| entry.is_expired(self.ttl))
            .count();
        CacheStats {
            total: entries.len(),
            valid: entries.len() - expired,
            expired,
        }
    }
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}
