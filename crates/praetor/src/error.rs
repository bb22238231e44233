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

//! Error types of the orchestration layer.
//!
//! Isolation is the governing principle: only credential resolution aborts
//! a run early. Missing court configuration and capture failures are
//! recorded per attempt and the run continues; evidence-persistence and
//! schedule-update failures are logged and never abort anything. Store- and
//! capture-level error types live next to their concern
//! ([`StoreError`](crate::stores::StoreError),
//! [`EvidenceError`](crate::stores::EvidenceError),
//! [`CaptureError`](crate::dispatcher::CaptureError)).

use thiserror::Error;
use uuid::Uuid;

use crate::stores::StoreError;

/// Why one credential id could not be resolved.
#[derive(Debug, Error)]
pub enum CredentialLookupError {
    #[error("credential {0} not found")]
    NotFound(Uuid),

    #[error("credential {0} is inactive")]
    Inactive(Uuid),

    #[error("credential {id} could not be loaded: {message}")]
    Store { id: Uuid, message: String },
}

impl CredentialLookupError {
    /// The credential id the failure refers to.
    pub fn credential_id(&self) -> Uuid {
        match self {
            CredentialLookupError::NotFound(id) => *id,
            CredentialLookupError::Inactive(id) => *id,
            CredentialLookupError::Store { id, .. } => *id,
        }
    }
}

/// Credential resolution failed for at least one requested id.
///
/// Fatal to the whole run: no court can be safely contacted when the
/// credential set is incomplete, so no capture attempts are made.
#[derive(Debug, Error)]
#[error("credential resolution failed for {}/{requested} credentials", .failures.len())]
pub struct ResolutionError {
    /// How many credential ids the run requested.
    pub requested: usize,
    /// Every per-id failure, in request order.
    pub failures: Vec<CredentialLookupError>,
}

impl ResolutionError {
    /// One line per failed credential, for run finalization detail.
    pub fn detail(&self) -> String {
        self.failures
            .iter()
            .map(|failure| failure.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A run could not be started at all.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("schedule could not be loaded: {0}")]
    Schedule(#[from] StoreError),
}
