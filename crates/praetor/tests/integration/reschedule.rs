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

//! Integration tests for the unconditional schedule update after a run.

use chrono::Timelike;
use std::sync::Arc;
use uuid::Uuid;

use praetor::cache::CredentialCache;
use praetor::dispatcher::CaptureDispatcher;
use praetor::executor::{ExecutionOptions, ScheduleExecutor};
use praetor::models::{Degree, JobType, Periodicity, Recurrence, RunStatus};
use praetor::resolver::CredentialResolver;
use praetor::stores::{CourtConfigProvider, CredentialStore, EvidenceStore, ScheduleStore};

use crate::fixtures::{
    credential, schedule, MemoryCredentialStore, MemoryEvidenceStore, MemoryScheduleStore,
    ScriptedExecutor, StaticCourtConfigs,
};

fn build_executor(
    schedules: &Arc<MemoryScheduleStore>,
    credentials: &Arc<MemoryCredentialStore>,
    configs: &Arc<StaticCourtConfigs>,
    evidence: &Arc<MemoryEvidenceStore>,
    job_type: JobType,
) -> ScheduleExecutor {
    let credential_store: Arc<dyn CredentialStore> = credentials.clone();
    let resolver =
        CredentialResolver::new(credential_store, Arc::new(CredentialCache::default()));

    let mut dispatcher = CaptureDispatcher::new();
    dispatcher.register(job_type, ScriptedExecutor::new());

    let schedule_store: Arc<dyn ScheduleStore> = schedules.clone();
    let config_provider: Arc<dyn CourtConfigProvider> = configs.clone();
    let evidence_store: Arc<dyn EvidenceStore> = evidence.clone();
    ScheduleExecutor::new(
        schedule_store,
        resolver,
        config_provider,
        Arc::new(dispatcher),
        evidence_store,
    )
}

#[tokio::test]
async fn test_daily_schedule_advances_to_next_time_of_day_occurrence() {
    let schedules = MemoryScheduleStore::new();
    let credentials = MemoryCredentialStore::new();
    let configs = StaticCourtConfigs::new();
    let evidence = MemoryEvidenceStore::new();
    let executor = build_executor(
        &schedules,
        &credentials,
        &configs,
        &evidence,
        JobType::FullDocket,
    );

    let tenant = Uuid::new_v4();
    let cred = credential(tenant, "TRT1", Degree::First);
    credentials.insert(cred.clone());
    configs.insert("TRT1", Degree::First);

    let sched = schedule(tenant, JobType::FullDocket, vec![cred.id]);
    schedules.insert(sched.clone());

    let report = executor.execute(&sched, ExecutionOptions::default()).await;
    assert_eq!(report.status, RunStatus::Success);

    let stored = schedules.snapshot(sched.id);
    let next = stored.next_execution.unwrap();
    // Strictly after completion, at the configured time of day, and exactly
    // what the recurrence computes for the completion instant.
    assert!(next > report.finished_at);
    assert_eq!((next.hour(), next.minute()), (8, 0));
    assert_eq!(next, sched.recurrence.next_after(report.finished_at).unwrap());
    assert_eq!(stored.last_execution.unwrap(), report.finished_at);
    assert!(next - report.finished_at <= chrono::Duration::days(1));
}

#[tokio::test]
async fn test_unschedulable_recurrence_is_logged_not_fatal() {
    let schedules = MemoryScheduleStore::new();
    let credentials = MemoryCredentialStore::new();
    let configs = StaticCourtConfigs::new();
    let evidence = MemoryEvidenceStore::new();
    let executor = build_executor(
        &schedules,
        &credentials,
        &configs,
        &evidence,
        JobType::Hearings,
    );

    let tenant = Uuid::new_v4();
    let cred = credential(tenant, "TRT3", Degree::First);
    credentials.insert(cred.clone());
    configs.insert("TRT3", Degree::First);

    let mut sched = schedule(tenant, JobType::Hearings, vec![cred.id]);
    // Custom periodicity without an interval cannot yield a next execution.
    sched.recurrence = Recurrence {
        periodicity: Periodicity::Custom,
        interval_days: None,
        time_of_day: sched.recurrence.time_of_day,
    };
    schedules.insert(sched.clone());

    let report = executor.execute(&sched, ExecutionOptions::default()).await;

    // The run outcome stands; only the cadence could not be advanced.
    assert_eq!(report.status, RunStatus::Success);
    assert!(report.next_execution.is_none());
    let stored = schedules.snapshot(sched.id);
    assert!(stored.last_execution.is_some());
    assert!(stored.next_execution.is_none());
}
