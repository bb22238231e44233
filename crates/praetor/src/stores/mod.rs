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

//! External collaborator interfaces.
//!
//! The orchestrator consumes its persistence and configuration layers
//! through the traits in this module: [`ScheduleStore`], [`CredentialStore`],
//! [`CourtConfigProvider`] and [`EvidenceStore`]. Implementations live
//! outside this crate (relational store, configuration service); the traits
//! specify only the interface boundary.
//!
//! Implementations must be thread-safe (`Send + Sync`). The credential store
//! is the source of truth for credentials — the in-process
//! [`CredentialCache`](crate::cache::CredentialCache) is an ephemeral
//! optimization layered on top of it, never a replacement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::capture::{NewCaptureEvidence, NewJobRun, RunStatus};
use crate::models::court::CourtConfig;
use crate::models::credential::{CredentialContext, Degree};
use crate::models::schedule::Schedule;

/// Errors surfaced by schedule, credential and court-configuration stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(Uuid),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the evidence store.
///
/// Evidence persistence is best-effort once an attempt's outcome is known:
/// callers log these errors with full context and continue.
#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error("evidence backend error: {0}")]
    Backend(String),
}

/// Read/update access to schedules.
///
/// The orchestrator mutates only the execution timestamps; all other
/// schedule fields are owned by the external CRUD layer.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Loads one schedule by id.
    async fn get(&self, schedule_id: Uuid) -> Result<Schedule, StoreError>;

    /// Persists a run's completion time and, when recomputed, the next
    /// execution time. `next_execution = None` leaves the stored value
    /// untouched.
    async fn update_execution_times(
        &self,
        schedule_id: Uuid,
        last_execution: DateTime<Utc>,
        next_execution: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    /// Returns schedules whose next execution is at or before `now`,
    /// ordered by next execution, capped at `limit`.
    async fn list_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Schedule>, StoreError>;
}

/// Read access to tenant credentials.
///
/// The store returns contexts with the login secret already decrypted and
/// enforces that at most one active credential exists per
/// (tenant, court, degree).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Loads one credential context by id, `None` when the id is unknown.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialContext>, StoreError>;

    /// Bulk-loads every *active* credential of `tenant_id` whose court is in
    /// `courts` and whose degree is in `degrees`, in a single query.
    async fn find_active_batch(
        &self,
        tenant_id: Uuid,
        courts: &[String],
        degrees: &[Degree],
    ) -> Result<Vec<CredentialContext>, StoreError>;
}

/// Lookup of static endpoint metadata for one (court, degree) portal.
#[async_trait]
pub trait CourtConfigProvider: Send + Sync {
    /// Returns the configuration for the combination, `None` when the court
    /// is not configured for that degree.
    async fn lookup(&self, court: &str, degree: Degree) -> Result<Option<CourtConfig>, StoreError>;
}

/// Append-only evidence sink.
///
/// Entries are immutable once written; the run record is the only piece
/// with a two-phase lifecycle (opened in-progress, finalized with the
/// aggregate outcome).
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Opens a run record in state "in-progress", before any external call.
    async fn open_run(&self, run: NewJobRun) -> Result<(), EvidenceError>;

    /// Appends one capture-attempt evidence entry.
    async fn append(&self, entry: NewCaptureEvidence) -> Result<(), EvidenceError>;

    /// Finalizes a run record with its aggregate outcome. `detail` carries
    /// the concatenated error messages on failure, a structured summary on
    /// success.
    async fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        detail: String,
        finished_at: DateTime<Utc>,
    ) -> Result<(), EvidenceError>;
}
