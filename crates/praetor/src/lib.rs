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

//! # Praetor
//!
//! Scheduled capture orchestration for judicial portal data.
//!
//! Praetor executes recurring capture jobs on behalf of many tenants
//! (attorneys), each holding credentials for up to 24 regional courts
//! across two instance degrees. One job run resolves the schedule's
//! credentials, dispatches to the capture executor registered for the job
//! type, records append-only evidence of every attempt, and recomputes the
//! schedule's next execution time.
//!
//! ## Architecture
//!
//! - [`cache::CredentialCache`] — in-process TTL cache for decrypted
//!   credentials, with a batch hydration path that turns dozens of
//!   per-combination queries into one bulk fetch.
//! - [`resolver::CredentialResolver`] — credential ids to full contexts,
//!   concurrent and all-or-nothing at the job level.
//! - [`dispatcher::CaptureDispatcher`] — strategy table from the closed
//!   [`models::JobType`] enum to external [`dispatcher::CaptureExecutor`]s;
//!   pending-filings sub-filters iterate in canonical order.
//! - [`evidence::RawCaptureLogger`] — best-effort append-only evidence
//!   writer.
//! - [`executor::ScheduleExecutor`] — one run end-to-end with per-credential
//!   failure isolation and unconditional rescheduling.
//! - [`runner::CaptureRunner`] — the polling loop that executes due
//!   schedules.
//!
//! ## Example
//!
//! ```rust,ignore
//! use praetor::cache::CredentialCache;
//! use praetor::dispatcher::CaptureDispatcher;
//! use praetor::executor::{ExecutionOptions, ScheduleExecutor};
//! use praetor::models::JobType;
//! use praetor::resolver::CredentialResolver;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(CredentialCache::default());
//! let resolver = CredentialResolver::new(credential_store, cache);
//!
//! let mut dispatcher = CaptureDispatcher::new();
//! dispatcher.register(JobType::FullDocket, docket_executor);
//!
//! let executor = ScheduleExecutor::new(
//!     schedule_store,
//!     resolver,
//!     court_config_provider,
//!     Arc::new(dispatcher),
//!     evidence_store,
//! );
//!
//! let report = executor
//!     .execute_by_id(schedule_id, ExecutionOptions::default())
//!     .await?;
//! println!("run {} completed: {}", report.run_id, report.status);
//! ```

pub mod cache;
pub mod dispatcher;
pub mod error;
pub mod evidence;
pub mod executor;
pub mod models;
pub mod resolver;
pub mod runner;
pub mod stores;

pub use cache::{CacheStats, CredentialCache};
pub use dispatcher::{
    CaptureDispatcher, CaptureError, CaptureExecutor, CaptureOutput, CaptureRequest,
};
pub use error::{CredentialLookupError, ResolutionError, RunError};
pub use evidence::RawCaptureLogger;
pub use executor::{AttemptRecord, ExecutionOptions, RunReport, ScheduleExecutor};
pub use models::{
    AttemptStatus, CourtConfig, CredentialContext, Degree, ExtraParams, JobType, LoginSecret,
    NewCaptureEvidence, NewJobRun, PendingFilter, Periodicity, Recurrence, RunStatus, Schedule,
};
pub use resolver::CredentialResolver;
pub use runner::{CaptureRunner, CaptureRunnerConfig};
pub use stores::{
    CourtConfigProvider, CredentialStore, EvidenceError, EvidenceStore, ScheduleStore, StoreError,
};
