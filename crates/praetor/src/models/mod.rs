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

//! Domain models shared across the orchestrator.

pub mod capture;
pub mod court;
pub mod credential;
pub mod schedule;

pub use capture::{AttemptStatus, NewCaptureEvidence, NewJobRun, RunStatus};
pub use court::CourtConfig;
pub use credential::{CredentialContext, Degree, LoginSecret};
pub use schedule::{
    DateRange, ExtraParams, JobType, PendingFilter, Periodicity, Recurrence, RecurrenceError,
    Schedule,
};
