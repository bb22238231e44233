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

//! Schedule Executor Module
//!
//! Orchestrates one job run end-to-end:
//! - Opens the run's evidence record before any external call
//! - Resolves the schedule's credentials (all-or-nothing)
//! - Processes each credential sequentially: court configuration lookup,
//!   dispatch to the capture executor, evidence per attempt
//! - Aggregates attempt outcomes into the run status
//! - Unconditionally updates the schedule's last/next execution
//!
//! A run transitions `Idle -> Running -> Completed(success | partial-failure
//! | total-failure)`. Credentials are processed strictly sequentially: this
//! bounds concurrent load against one tenant's portals and keeps evidence
//! writes ordered and attributable per credential. No lock is held across
//! any suspension point.

use chrono::Utc;
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::types::{AttemptRecord, ExecutionOptions, RunReport};
use crate::dispatcher::CaptureDispatcher;
use crate::error::RunError;
use crate::evidence::RawCaptureLogger;
use crate::models::capture::{AttemptStatus, NewCaptureEvidence, NewJobRun, RunStatus};
use crate::models::credential::CredentialContext;
use crate::models::schedule::{PendingFilter, Schedule};
use crate::resolver::CredentialResolver;
use crate::stores::{CourtConfigProvider, EvidenceStore, ScheduleStore};

/// Executes scheduled capture jobs.
///
/// All collaborators are injected; the executor holds no global state and
/// distinct instances (or concurrent runs of one instance) are fully
/// independent.
pub struct ScheduleExecutor {
    schedules: Arc<dyn ScheduleStore>,
    resolver: CredentialResolver,
    court_configs: Arc<dyn CourtConfigProvider>,
    dispatcher: Arc<CaptureDispatcher>,
    evidence: RawCaptureLogger,
}

impl ScheduleExecutor {
    /// Creates an executor over the given collaborators.
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        resolver: CredentialResolver,
        court_configs: Arc<dyn CourtConfigProvider>,
        dispatcher: Arc<CaptureDispatcher>,
        evidence_store: Arc<dyn EvidenceStore>,
    ) -> Self {
        Self {
            schedules,
            resolver,
            court_configs,
            dispatcher,
            evidence: RawCaptureLogger::new(evidence_store),
        }
    }

    /// Loads a schedule and executes it.
    pub async fn execute_by_id(
        &self,
        schedule_id: Uuid,
        options: ExecutionOptions,
    ) -> Result<RunReport, RunError> {
        let schedule = self.schedules.get(schedule_id).await?;
        Ok(self.execute(&schedule, options).await)
    }

    /// Executes one job run to completion and returns its report.
    ///
    /// Never returns early: credential resolution failure completes the run
    /// as a total failure with zero attempts, and every later failure is
    /// isolated per credential (or per sub-filter). The schedule's last
    /// execution — and, when requested, next execution — is updated
    /// regardless of the outcome.
    pub async fn execute(&self, schedule: &Schedule, options: ExecutionOptions) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(
            job_run_id = %run_id,
            schedule_id = %schedule.id,
            tenant_id = %schedule.tenant_id,
            job_type = %schedule.job_type,
            credentials = schedule.credential_ids.len(),
            "Run state change: Idle -> Running"
        );

        // Open the run record before any external call so a crash mid-run
        // still leaves an auditable trace.
        self.evidence
            .open_run(NewJobRun {
                id: run_id,
                schedule_id: schedule.id,
                job_type: schedule.job_type,
                tenant_id: schedule.tenant_id,
                credential_ids: schedule.credential_ids.clone(),
                started_at,
            })
            .await;

        let contexts = match self.resolver.resolve_many(&schedule.credential_ids).await {
            Ok(contexts) => contexts,
            Err(resolution_error) => {
                error!(
                    job_run_id = %run_id,
                    schedule_id = %schedule.id,
                    tenant_id = %schedule.tenant_id,
                    job_type = %schedule.job_type,
                    error = %resolution_error,
                    "Credential resolution failed; completing run with no capture attempts"
                );
                let detail = resolution_error.detail();
                return self
                    .complete(
                        schedule,
                        options,
                        run_id,
                        started_at,
                        RunStatus::TotalFailure,
                        Vec::new(),
                        Some(detail),
                    )
                    .await;
            }
        };

        // Strictly sequential by design: bounded load per tenant, ordered
        // evidence.
        let mut attempts = Vec::new();
        for context in &contexts {
            self.process_credential(schedule, run_id, context, &mut attempts)
                .await;
        }

        let errors = attempts
            .iter()
            .filter(|attempt| attempt.status == AttemptStatus::Error)
            .count();
        let successes = attempts.len() - errors;
        let status = if errors == 0 {
            RunStatus::Success
        } else if successes > 0 {
            RunStatus::PartialFailure
        } else {
            RunStatus::TotalFailure
        };

        self.complete(schedule, options, run_id, started_at, status, attempts, None)
            .await
    }

    /// Processes one resolved credential, appending its attempt records.
    ///
    /// Failures here are isolated: a missing court configuration or a
    /// failed capture is recorded and the caller moves on to the next
    /// credential.
    async fn process_credential(
        &self,
        schedule: &Schedule,
        run_id: Uuid,
        context: &CredentialContext,
        attempts: &mut Vec<AttemptRecord>,
    ) {
        let court_config = match self.court_configs.lookup(&context.court, context.degree).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                let message = format!(
                    "no court configuration for {} ({} degree)",
                    context.court, context.degree
                );
                warn!(
                    job_run_id = %run_id,
                    tenant_id = %schedule.tenant_id,
                    credential_id = %context.id,
                    court = %context.court,
                    degree = %context.degree,
                    job_type = %schedule.job_type,
                    "Court configuration missing; recording error attempt and continuing"
                );
                self.record_error_attempt(schedule, run_id, context, None, message, attempts)
                    .await;
                return;
            }
            Err(lookup_error) => {
                let message = format!("court configuration lookup failed: {}", lookup_error);
                warn!(
                    job_run_id = %run_id,
                    tenant_id = %schedule.tenant_id,
                    credential_id = %context.id,
                    court = %context.court,
                    degree = %context.degree,
                    job_type = %schedule.job_type,
                    error = %lookup_error,
                    "Court configuration lookup failed; recording error attempt and continuing"
                );
                self.record_error_attempt(schedule, run_id, context, None, message, attempts)
                    .await;
                return;
            }
        };

        let dispatched = self
            .dispatcher
            .dispatch(
                schedule.job_type,
                context.clone(),
                court_config,
                schedule.params.clone(),
            )
            .await;

        for attempt in dispatched {
            match attempt.outcome {
                Ok(output) => {
                    let entry = NewCaptureEvidence {
                        job_run_id: run_id,
                        job_type: schedule.job_type,
                        tenant_id: schedule.tenant_id,
                        credential_id: context.id,
                        credential_ids: schedule.credential_ids.clone(),
                        court: context.court.clone(),
                        degree: context.degree,
                        status: AttemptStatus::Success,
                        request: request_descriptor(schedule, attempt.sub_filter),
                        raw_payload: Some(output.raw_payload),
                        processed_summary: Some(output.processed_summary),
                        logs: Some(output.execution_logs),
                    };
                    self.evidence.append(entry.clone()).await;
                    if let Some(parts) = output.parts_payload {
                        self.evidence.append_parts(&entry, parts).await;
                    }
                    attempts.push(AttemptRecord {
                        credential_id: context.id,
                        court: context.court.clone(),
                        degree: context.degree,
                        sub_filter: attempt.sub_filter,
                        status: AttemptStatus::Success,
                        error: None,
                    });
                }
                Err(capture_error) => {
                    warn!(
                        job_run_id = %run_id,
                        tenant_id = %schedule.tenant_id,
                        credential_id = %context.id,
                        court = %context.court,
                        degree = %context.degree,
                        job_type = %schedule.job_type,
                        sub_filter = attempt.sub_filter.map(|f| f.as_str()).unwrap_or("-"),
                        error = %capture_error,
                        "Capture attempt failed; recording error attempt and continuing"
                    );
                    self.record_error_attempt(
                        schedule,
                        run_id,
                        context,
                        attempt.sub_filter,
                        capture_error.to_string(),
                        attempts,
                    )
                    .await;
                }
            }
        }
    }

    /// Appends an error evidence entry and its attempt record.
    async fn record_error_attempt(
        &self,
        schedule: &Schedule,
        run_id: Uuid,
        context: &CredentialContext,
        sub_filter: Option<PendingFilter>,
        message: String,
        attempts: &mut Vec<AttemptRecord>,
    ) {
        self.evidence
            .append(NewCaptureEvidence {
                job_run_id: run_id,
                job_type: schedule.job_type,
                tenant_id: schedule.tenant_id,
                credential_id: context.id,
                credential_ids: schedule.credential_ids.clone(),
                court: context.court.clone(),
                degree: context.degree,
                status: AttemptStatus::Error,
                request: request_descriptor(schedule, sub_filter),
                raw_payload: None,
                processed_summary: None,
                logs: Some(vec![message.clone()]),
            })
            .await;
        attempts.push(AttemptRecord {
            credential_id: context.id,
            court: context.court.clone(),
            degree: context.degree,
            sub_filter,
            status: AttemptStatus::Error,
            error: Some(message),
        });
    }

    /// Finalizes the evidence record, updates the schedule, and builds the
    /// report.
    ///
    /// The schedule update runs unconditionally; its failure is logged and
    /// does not retroactively change the run's recorded outcome.
    #[allow(clippy::too_many_arguments)]
    async fn complete(
        &self,
        schedule: &Schedule,
        options: ExecutionOptions,
        run_id: Uuid,
        started_at: chrono::DateTime<Utc>,
        status: RunStatus,
        attempts: Vec<AttemptRecord>,
        failure_detail: Option<String>,
    ) -> RunReport {
        let finished_at = Utc::now();

        let detail = match (&failure_detail, status) {
            (Some(detail), _) => detail.clone(),
            (None, RunStatus::Success) => {
                let credentials: HashSet<Uuid> =
                    attempts.iter().map(|attempt| attempt.credential_id).collect();
                let sub_filters = attempts
                    .iter()
                    .filter(|attempt| attempt.sub_filter.is_some())
                    .count();
                serde_json::json!({
                    "credentialsProcessed": credentials.len(),
                    "subFiltersExecuted": sub_filters,
                })
                .to_string()
            }
            (None, _) => attempts
                .iter()
                .filter_map(|attempt| attempt.error.as_deref())
                .collect::<Vec<_>>()
                .join("; "),
        };

        self.evidence
            .finalize_run(run_id, status, detail, finished_at)
            .await;

        info!(
            job_run_id = %run_id,
            schedule_id = %schedule.id,
            tenant_id = %schedule.tenant_id,
            job_type = %schedule.job_type,
            attempts = attempts.len(),
            "Run state change: Running -> Completed({})",
            status
        );
        counter!("praetor.runs", "status" => status.as_str()).increment(1);

        let next_execution = if options.auto_reschedule {
            match schedule.recurrence.next_after(finished_at) {
                Ok(next) => Some(next),
                Err(recurrence_error) => {
                    error!(
                        schedule_id = %schedule.id,
                        error = %recurrence_error,
                        "Next execution could not be computed; schedule not advanced"
                    );
                    None
                }
            }
        } else {
            None
        };

        if let Err(update_error) = self
            .schedules
            .update_execution_times(schedule.id, finished_at, next_execution)
            .await
        {
            error!(
                schedule_id = %schedule.id,
                tenant_id = %schedule.tenant_id,
                job_type = %schedule.job_type,
                error = %update_error,
                "Failed to update schedule execution times; run outcome stands"
            );
        }

        RunReport {
            run_id,
            schedule_id: schedule.id,
            job_type: schedule.job_type,
            status,
            attempts,
            failure_detail,
            started_at,
            finished_at,
            next_execution,
        }
    }
}

/// Request descriptor stored in every evidence entry.
fn request_descriptor(
    schedule: &Schedule,
    sub_filter: Option<PendingFilter>,
) -> serde_json::Value {
    let mut request = serde_json::json!({
        "jobType": schedule.job_type,
        "params": schedule.params,
    });
    if let Some(filter) = sub_filter {
        request["subFilter"] = serde_json::json!(filter);
    }
    request
}
