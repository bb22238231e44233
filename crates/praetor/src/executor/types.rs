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

//! Types shared by the schedule executor and its callers.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::capture::{AttemptStatus, RunStatus};
use crate::models::credential::Degree;
use crate::models::schedule::{JobType, PendingFilter};

/// Caller-controlled behavior of one run.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionOptions {
    /// Recompute and persist the next execution time after the run.
    /// Disabled for one-off manual invocations that must not touch the
    /// schedule's cadence.
    pub auto_reschedule: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            auto_reschedule: true,
        }
    }
}

/// Outcome of one capture attempt, mirrored from its evidence entry.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub credential_id: Uuid,
    pub court: String,
    pub degree: Degree,
    pub sub_filter: Option<PendingFilter>,
    pub status: AttemptStatus,
    /// Error message for error attempts.
    pub error: Option<String>,
}

/// Completion report of one job run.
///
/// Returned by [`ScheduleExecutor::execute`](crate::executor::ScheduleExecutor::execute)
/// so callers observe completion deterministically instead of firing and
/// forgetting.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub schedule_id: Uuid,
    pub job_type: JobType,
    pub status: RunStatus,
    /// Every attempt in execution order; empty when credential resolution
    /// failed.
    pub attempts: Vec<AttemptRecord>,
    /// Resolution failure detail for runs that never made an attempt.
    pub failure_detail: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Next execution persisted by this run, when rescheduling was requested
    /// and succeeded.
    pub next_execution: Option<DateTime<Utc>>,
}

impl RunReport {
    /// Number of successful attempts.
    pub fn successes(&self) -> usize {
        self.attempts
            .iter()
            .filter(|attempt| attempt.status == AttemptStatus::Success)
            .count()
    }

    /// Number of error attempts.
    pub fn errors(&self) -> usize {
        self.attempts
            .iter()
            .filter(|attempt| attempt.status == AttemptStatus::Error)
            .count()
    }
}
