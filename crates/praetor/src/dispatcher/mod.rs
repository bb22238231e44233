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

//! Capture Dispatcher Module
//!
//! A strategy table keyed by the closed [`JobType`] enum: each entry
//! delegates to the external [`CaptureExecutor`] registered for that job
//! type. Job types are heterogeneous in shape (date ranges for hearings,
//! sub-filter sets for pending filings) but dispatch through one uniform
//! interface, so branching never leaks into the orchestrator.
//!
//! The pending-filings variant is the one contained special case: its
//! ordered, de-duplicated sub-filter list is executed as independent
//! attempts, and a failure in one sub-filter does not prevent the remaining
//! sub-filters from running.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::court::CourtConfig;
use crate::models::credential::CredentialContext;
use crate::models::schedule::{ExtraParams, JobType, PendingFilter};

/// Input of one capture call against a single (court, degree) portal.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Credential to authenticate with.
    pub credential: CredentialContext,
    /// Endpoint metadata of the target portal.
    pub court_config: CourtConfig,
    /// Job-type-specific parameters from the schedule.
    pub params: ExtraParams,
    /// Sub-filter of this attempt; set only for pending-filings jobs.
    pub sub_filter: Option<PendingFilter>,
}

/// Output of one successful capture call.
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    /// Structured capture result for the case-record pipeline.
    pub structured_result: serde_json::Value,
    /// Raw payload exactly as captured, preserved verbatim for evidence.
    pub raw_payload: serde_json::Value,
    /// Counts and deltas reported by downstream persistence.
    pub processed_summary: serde_json::Value,
    /// Log lines produced while executing the capture.
    pub execution_logs: Vec<String>,
    /// Secondary payload produced as a by-product (e.g. case parts),
    /// evidenced separately for independent reprocessing.
    pub parts_payload: Option<serde_json::Value>,
}

/// Errors raised by capture execution.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no capture executor registered for job type {0}")]
    NotRegistered(JobType),

    #[error("portal authentication failed: {0}")]
    Authentication(String),

    #[error("portal request failed: {0}")]
    Portal(String),

    #[error("capture failed: {0}")]
    Other(String),
}

/// External capture capability for one job type.
///
/// Implementations own the browser/automation layer, including per-call
/// timeouts; the orchestrator imposes none of its own.
#[async_trait]
pub trait CaptureExecutor: Send + Sync {
    /// Performs one capture cycle and returns its full output.
    async fn capture(&self, request: CaptureRequest) -> Result<CaptureOutput, CaptureError>;
}

/// Result of one dispatched attempt.
///
/// Non-pending job types produce exactly one attempt with no sub-filter;
/// pending-filings jobs produce one attempt per canonical sub-filter.
#[derive(Debug)]
pub struct DispatchAttempt {
    pub sub_filter: Option<PendingFilter>,
    pub outcome: Result<CaptureOutput, CaptureError>,
}

/// Strategy table mapping job types to their capture executors.
pub struct CaptureDispatcher {
    executors: HashMap<JobType, Arc<dyn CaptureExecutor>>,
}

impl CaptureDispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            executors: HashMap::new(),
        }
    }

    /// Registers the executor for a job type, replacing any previous one.
    pub fn register(&mut self, job_type: JobType, executor: Arc<dyn CaptureExecutor>) {
        debug!(job_type = %job_type, "Registered capture executor");
        self.executors.insert(job_type, executor);
    }

    /// Whether an executor is registered for the job type.
    pub fn is_registered(&self, job_type: JobType) -> bool {
        self.executors.contains_key(&job_type)
    }

    /// Dispatches one credential's capture for the job type.
    ///
    /// For pending-filings, the requested sub-filters are canonicalized
    /// (ordered, de-duplicated, defaulting to no-deadline) and each is
    /// executed as an independent attempt. Attempts are returned in
    /// execution order.
    pub async fn dispatch(
        &self,
        job_type: JobType,
        credential: CredentialContext,
        court_config: CourtConfig,
        params: ExtraParams,
    ) -> Vec<DispatchAttempt> {
        let executor = match self.executors.get(&job_type) {
            Some(executor) => Arc::clone(executor),
            None => {
                warn!(job_type = %job_type, "Dispatch requested for unregistered job type");
                return vec![DispatchAttempt {
                    sub_filter: None,
                    outcome: Err(CaptureError::NotRegistered(job_type)),
                }];
            }
        };

        match job_type {
            JobType::PendingFilings => {
                let requested = params.pending_filters.clone().unwrap_or_default();
                let filters = PendingFilter::canonicalize(&requested);
                let mut attempts = Vec::with_capacity(filters.len());
                for filter in filters {
                    let outcome = executor
                        .capture(CaptureRequest {
                            credential: credential.clone(),
                            court_config: court_config.clone(),
                            params: params.clone(),
                            sub_filter: Some(filter),
                        })
                        .await;
                    attempts.push(DispatchAttempt {
                        sub_filter: Some(filter),
                        outcome,
                    });
                }
                attempts
            }
            _ => {
                let outcome = executor
                    .capture(CaptureRequest {
                        credential,
                        court_config,
                        params,
                        sub_filter: None,
                    })
                    .await;
                vec![DispatchAttempt {
                    sub_filter: None,
                    outcome,
                }]
            }
        }
    }
}

impl Default for CaptureDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
