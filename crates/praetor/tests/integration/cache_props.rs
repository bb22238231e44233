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

//! Integration tests for the credential cache batch path and the
//! cache-first combination resolver.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use uuid::Uuid;

use praetor::cache::CredentialCache;
use praetor::models::Degree;
use praetor::resolver::CredentialResolver;
use praetor::stores::CredentialStore;

use crate::fixtures::{credential, MemoryCredentialStore};

/// Every (court, degree) combination of the full 24-court grid.
fn full_grid() -> Vec<(String, Degree)> {
    (1..=24)
        .flat_map(|region| {
            [
                (format!("TRT{}", region), Degree::First),
                (format!("TRT{}", region), Degree::Second),
            ]
        })
        .collect()
}

#[tokio::test]
async fn test_hydrate_batch_issues_exactly_one_fetch_for_48_combinations() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    let combinations = full_grid();
    for (court, degree) in &combinations {
        store.insert(credential(tenant, court, *degree));
    }

    let cache = CredentialCache::default();
    let resolved = cache
        .hydrate_batch(store.as_ref(), tenant, &combinations)
        .await;

    assert_eq!(resolved.len(), 48);
    assert!(resolved.values().all(|slot| slot.is_some()));
    assert_eq!(store.batch_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(store.point_fetches.load(Ordering::SeqCst), 0);

    // Every hydrated combination now serves point lookups from the cache.
    for (court, degree) in &combinations {
        assert!(cache.lookup(tenant, court, *degree).is_some());
    }
}

#[tokio::test]
async fn test_hydrate_batch_marks_unmatched_combinations_absent() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    store.insert(credential(tenant, "TRT1", Degree::First));

    let cache = CredentialCache::default();
    let combinations = vec![
        ("TRT1".to_string(), Degree::First),
        ("TRT1".to_string(), Degree::Second),
        ("TRT7".to_string(), Degree::First),
    ];
    let resolved = cache
        .hydrate_batch(store.as_ref(), tenant, &combinations)
        .await;

    assert!(resolved[&("TRT1".to_string(), Degree::First)].is_some());
    assert!(resolved[&("TRT1".to_string(), Degree::Second)].is_none());
    assert!(resolved[&("TRT7".to_string(), Degree::First)].is_none());
    assert_eq!(store.batch_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_hydrate_batch_store_failure_resolves_all_absent() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    store.insert(credential(tenant, "TRT1", Degree::First));
    store.fail_batch.store(true, Ordering::SeqCst);

    let cache = CredentialCache::default();
    let combinations = vec![
        ("TRT1".to_string(), Degree::First),
        ("TRT2".to_string(), Degree::First),
    ];
    let resolved = cache
        .hydrate_batch(store.as_ref(), tenant, &combinations)
        .await;

    assert_eq!(resolved.len(), 2);
    assert!(resolved.values().all(|slot| slot.is_none()));
    // Nothing was cached from the failed fetch.
    assert_eq!(cache.stats().total, 0);
}

#[tokio::test]
async fn test_resolve_combinations_serves_repeat_calls_from_cache() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    let combinations = full_grid();
    for (court, degree) in &combinations {
        store.insert(credential(tenant, court, *degree));
    }

    let credential_store: Arc<dyn CredentialStore> = store.clone();
    let resolver =
        CredentialResolver::new(credential_store, Arc::new(CredentialCache::default()));

    let first = resolver.resolve_combinations(tenant, &combinations).await;
    assert!(first.values().all(|slot| slot.is_some()));
    assert_eq!(store.batch_fetches.load(Ordering::SeqCst), 1);

    let second = resolver.resolve_combinations(tenant, &combinations).await;
    assert!(second.values().all(|slot| slot.is_some()));
    // Fully served by point lookups; no additional fetch of any kind.
    assert_eq!(store.batch_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(store.point_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolve_many_writes_through_to_the_cache() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    let first = credential(tenant, "TRT1", Degree::First);
    let second = credential(tenant, "TRT2", Degree::Second);
    store.insert(first.clone());
    store.insert(second.clone());

    let cache = Arc::new(CredentialCache::default());
    let credential_store: Arc<dyn CredentialStore> = store.clone();
    let resolver = CredentialResolver::new(credential_store, cache.clone());

    let resolved = resolver.resolve_many(&[first.id, second.id]).await.unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].id, first.id);
    assert_eq!(resolved[1].id, second.id);
    assert_eq!(store.point_fetches.load(Ordering::SeqCst), 2);

    // Both combinations landed in the cache on the way through.
    assert!(cache.lookup(tenant, "TRT1", Degree::First).is_some());
    assert!(cache.lookup(tenant, "TRT2", Degree::Second).is_some());
    assert_eq!(store.point_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_resolve_many_collects_every_failure() {
    let store = MemoryCredentialStore::new();
    let tenant = Uuid::new_v4();
    let known = credential(tenant, "TRT1", Degree::First);
    let mut inactive = credential(tenant, "TRT2", Degree::First);
    inactive.active = false;
    store.insert(known.clone());
    store.insert(inactive.clone());
    let missing = Uuid::new_v4();

    let credential_store: Arc<dyn CredentialStore> = store.clone();
    let resolver =
        CredentialResolver::new(credential_store, Arc::new(CredentialCache::default()));

    let error = resolver
        .resolve_many(&[known.id, inactive.id, missing])
        .await
        .unwrap_err();

    assert_eq!(error.requested, 3);
    assert_eq!(error.failures.len(), 2);
    let detail = error.detail();
    assert!(detail.contains("inactive"));
    assert!(detail.contains("not found"));
}
