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

//! Capture Evidence Model
//!
//! This module defines the append-only evidence records produced by a job
//! run: the run record itself ([`NewJobRun`]) and one [`NewCaptureEvidence`]
//! entry per (credential, sub-filter) attempt. Evidence entries are created
//! fresh on every execution and never mutated after being written; they
//! exist for audit and future reprocessing independent of the case-record
//! pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::credential::Degree;
use super::schedule::JobType;

/// Outcome of a single capture attempt.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Success,
    Error,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Success => "success",
            AttemptStatus::Error => "error",
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate outcome of one job run.
///
/// Computed from the full set of attempt outcomes: any error attempt makes
/// the run a partial failure when at least one attempt succeeded, a total
/// failure otherwise.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Success,
    PartialFailure,
    TotalFailure,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::PartialFailure => "partial-failure",
            RunStatus::TotalFailure => "total-failure",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record opening one job run in the evidence store.
///
/// Written in state "in-progress" before any external call so that a crash
/// mid-run still leaves an auditable trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobRun {
    /// Unique identifier of this run.
    pub id: Uuid,
    /// Schedule that produced the run.
    pub schedule_id: Uuid,
    /// Job type executed by the run.
    pub job_type: JobType,
    /// Tenant the run captures data for.
    pub tenant_id: Uuid,
    /// Every credential the run spans.
    pub credential_ids: Vec<Uuid>,
    /// When the run entered the Running state.
    pub started_at: DateTime<Utc>,
}

/// One append-only evidence entry for a capture attempt.
///
/// `raw_payload`, `processed_summary` and `logs` are optional; every other
/// field is mandatory. The raw payload is preserved verbatim as returned by
/// the capture executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCaptureEvidence {
    /// Parent job run.
    pub job_run_id: Uuid,
    /// Job type the entry was produced under.
    pub job_type: JobType,
    /// Tenant the capture ran for.
    pub tenant_id: Uuid,
    /// Credential used by this attempt.
    pub credential_id: Uuid,
    /// Every credential of the parent run, for cross-referencing.
    pub credential_ids: Vec<Uuid>,
    /// Court code the attempt targeted.
    pub court: String,
    /// Instance degree the attempt targeted.
    pub degree: Degree,
    /// Attempt outcome.
    pub status: AttemptStatus,
    /// Request descriptor: job type, parameters, sub-filter.
    pub request: serde_json::Value,
    /// Raw capture payload, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_payload: Option<serde_json::Value>,
    /// Counts and deltas reported by downstream persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_summary: Option<serde_json::Value>,
    /// Execution log lines of the attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}
