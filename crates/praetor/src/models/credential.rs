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

//! Credential Domain Model
//!
//! This module defines the credential types consumed by the orchestrator:
//! the judicial instance [`Degree`], the redacting [`LoginSecret`], and the
//! fully resolved [`CredentialContext`] handed to capture executors.
//!
//! The credential store enforces that at most one *active* credential exists
//! per (tenant, court, degree) combination; this crate consumes that
//! invariant as a given and never re-checks it.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Judicial instance level a credential is scoped to.
///
/// Every regional court exposes two independent portals, one per degree, and
/// a tenant may hold a separate credential for each.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    /// First instance (trial level).
    First,
    /// Second instance (appellate level).
    Second,
}

impl Degree {
    /// Stable string form used in evidence entries and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Degree::First => "first",
            Degree::Second => "second",
        }
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decrypted portal login secret.
///
/// The credential store hands this to the orchestrator already decrypted.
/// `Debug` output redacts both fields so the secret can never leak through
/// error messages, evidence entries, or log lines.
#[derive(Clone)]
pub struct LoginSecret {
    pub username: String,
    pub password: String,
}

impl LoginSecret {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSecret")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved credential context.
///
/// Carries everything a capture executor needs to authenticate against one
/// (court, degree) portal on behalf of one tenant.
#[derive(Debug, Clone)]
pub struct CredentialContext {
    /// Unique identifier of the credential record.
    pub id: Uuid,
    /// Tenant (attorney) that owns this credential.
    pub tenant_id: Uuid,
    /// Regional court code (e.g. "TRT1").
    pub court: String,
    /// Judicial instance the credential is scoped to.
    pub degree: Degree,
    /// Decrypted login secret.
    pub secret: LoginSecret,
    /// Whether the credential is currently active.
    pub active: bool,
}

impl CredentialContext {
    /// The (court, degree) combination this credential authenticates against.
    pub fn combination(&self) -> (String, Degree) {
        (self.court.clone(), self.degree)
    }
}
