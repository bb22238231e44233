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

//! Credential Resolver Module
//!
//! Resolves credential ids into full [`CredentialContext`]s (tenant, court,
//! degree, decrypted secret), feeding the [`CredentialCache`]
//! opportunistically. Individual lookups are independent read-only I/O and
//! run with bounded parallelism; resolution as a whole is all-or-nothing at
//! the job level — one unresolvable id means no court can be safely
//! contacted, so the run never starts. This is the opposite of capture
//! execution, where failures are isolated per credential.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::CredentialCache;
use crate::error::{CredentialLookupError, ResolutionError};
use crate::models::credential::{CredentialContext, Degree};
use crate::stores::CredentialStore;

/// How many credential lookups may be in flight at once.
const RESOLVE_CONCURRENCY: usize = 8;

/// Resolves credential ids against the store, through the cache.
#[derive(Clone)]
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    cache: Arc<CredentialCache>,
}

impl CredentialResolver {
    /// Creates a resolver over the given store and cache.
    pub fn new(store: Arc<dyn CredentialStore>, cache: Arc<CredentialCache>) -> Self {
        Self { store, cache }
    }

    /// The cache this resolver feeds.
    pub fn cache(&self) -> &Arc<CredentialCache> {
        &self.cache
    }

    /// Resolves every id or fails the whole set.
    ///
    /// Lookups run concurrently (bounded, order-preserving); each resolved
    /// context is written through to the cache. Any id that is unknown,
    /// inactive, or unreadable fails the set with every per-id failure
    /// collected.
    pub async fn resolve_many(
        &self,
        credential_ids: &[Uuid],
    ) -> Result<Vec<CredentialContext>, ResolutionError> {
        let outcomes: Vec<Result<CredentialContext, CredentialLookupError>> =
            stream::iter(credential_ids.iter().copied())
                .map(|id| self.resolve_one(id))
                .buffered(RESOLVE_CONCURRENCY)
                .collect()
                .await;

        let mut resolved = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(context) => resolved.push(context),
                Err(failure) => failures.push(failure),
            }
        }

        if failures.is_empty() {
            debug!(count = resolved.len(), "Resolved credential set");
            Ok(resolved)
        } else {
            for failure in &failures {
                warn!(
                    credential_id = %failure.credential_id(),
                    error = %failure,
                    "Credential failed to resolve"
                );
            }
            Err(ResolutionError {
                requested: credential_ids.len(),
                failures,
            })
        }
    }

    /// Resolves every requested (court, degree) combination of one tenant,
    /// cache-first.
    ///
    /// Point lookups serve what the cache already holds; the remaining
    /// combinations are hydrated with a single batch fetch. Combinations
    /// without an active credential resolve to `None`.
    pub async fn resolve_combinations(
        &self,
        tenant_id: Uuid,
        combinations: &[(String, Degree)],
    ) -> HashMap<(String, Degree), Option<CredentialContext>> {
        let mut resolved = HashMap::with_capacity(combinations.len());
        let mut misses = Vec::new();

        for (court, degree) in combinations {
            match self.cache.lookup(tenant_id, court, *degree) {
                Some(context) => {
                    resolved.insert((court.clone(), *degree), Some(context));
                }
                None => misses.push((court.clone(), *degree)),
            }
        }

        if !misses.is_empty() {
            let hydrated = self
                .cache
                .hydrate_batch(self.store.as_ref(), tenant_id, &misses)
                .await;
            resolved.extend(hydrated);
        }

        resolved
    }

    async fn resolve_one(&self, id: Uuid) -> Result<CredentialContext, CredentialLookupError> {
        match self.store.find_by_id(id).await {
            Ok(Some(context)) if context.active => {
                self.cache.store(context.clone());
                Ok(context)
            }
            Ok(Some(_)) => Err(CredentialLookupError::Inactive(id)),
            Ok(None) => Err(CredentialLookupError::NotFound(id)),
            Err(error) => Err(CredentialLookupError::Store {
                id,
                message: error.to_string(),
            }),
        }
    }
}
