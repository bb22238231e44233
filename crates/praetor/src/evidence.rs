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

//! Raw Capture Logger
//!
//! Best-effort writer over the [`EvidenceStore`]: once an attempt's outcome
//! is known, a persistence failure must not change it or abort the run, so
//! every write error is logged to the operator console with enough context
//! to diagnose it (tenant, court, degree, job type) and swallowed.
//!
//! Secondary "parts" payloads produced as a by-product of a capture are
//! appended as their own entries, tagged with the parent capture type, so
//! they can be reprocessed later independent of the case-record pipeline.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::models::capture::{AttemptStatus, NewCaptureEvidence, NewJobRun, RunStatus};
use crate::stores::EvidenceStore;

/// Append-only evidence sink with best-effort semantics.
#[derive(Clone)]
pub struct RawCaptureLogger {
    store: Arc<dyn EvidenceStore>,
}

impl RawCaptureLogger {
    pub fn new(store: Arc<dyn EvidenceStore>) -> Self {
        Self { store }
    }

    /// Opens the run record in state "in-progress".
    ///
    /// Called before any external call so a crash mid-run still leaves an
    /// auditable trace.
    pub async fn open_run(&self, run: NewJobRun) {
        let run_id = run.id;
        let tenant_id = run.tenant_id;
        let job_type = run.job_type;
        if let Err(persist_error) = self.store.open_run(run).await {
            counter!("praetor.evidence.write_failures").increment(1);
            error!(
                job_run_id = %run_id,
                tenant_id = %tenant_id,
                job_type = %job_type,
                error = %persist_error,
                "Failed to open job-run evidence record"
            );
        }
    }

    /// Appends one capture-attempt entry.
    pub async fn append(&self, entry: NewCaptureEvidence) {
        let context = (
            entry.job_run_id,
            entry.tenant_id,
            entry.court.clone(),
            entry.degree,
            entry.job_type,
            entry.status,
        );
        if let Err(persist_error) = self.store.append(entry).await {
            counter!("praetor.evidence.write_failures").increment(1);
            let (job_run_id, tenant_id, court, degree, job_type, status) = context;
            error!(
                job_run_id = %job_run_id,
                tenant_id = %tenant_id,
                court = %court,
                degree = %degree,
                job_type = %job_type,
                status = %status,
                error = %persist_error,
                "Failed to append capture evidence entry"
            );
        }
    }

    /// Appends a secondary "parts" entry derived from a successful attempt.
    ///
    /// The entry carries the parent job type and references the parent run
    /// and credential, with the parts payload preserved verbatim.
    pub async fn append_parts(&self, parent: &NewCaptureEvidence, parts: serde_json::Value) {
        self.append(NewCaptureEvidence {
            job_run_id: parent.job_run_id,
            job_type: parent.job_type,
            tenant_id: parent.tenant_id,
            credential_id: parent.credential_id,
            credential_ids: parent.credential_ids.clone(),
            court: parent.court.clone(),
            degree: parent.degree,
            status: AttemptStatus::Success,
            request: serde_json::json!({
                "kind": "secondary-parts",
                "parentJobType": parent.job_type,
            }),
            raw_payload: Some(parts),
            processed_summary: None,
            logs: None,
        })
        .await;
    }

    /// Finalizes the run record with its aggregate outcome.
    pub async fn finalize_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        detail: String,
        finished_at: DateTime<Utc>,
    ) {
        if let Err(persist_error) = self
            .store
            .finalize_run(run_id, status, detail, finished_at)
            .await
        {
            counter!("praetor.evidence.write_failures").increment(1);
            error!(
                job_run_id = %run_id,
                status = %status,
                error = %persist_error,
                "Failed to finalize job-run evidence record"
            );
        }
    }
}
