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

//! Court configuration model.
//!
//! Static endpoint and display metadata for one (court, degree) portal,
//! provided by an external [`CourtConfigProvider`](crate::stores::CourtConfigProvider).

use serde::{Deserialize, Serialize};

use super::credential::Degree;

/// Endpoint and display metadata for one (court, degree) portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtConfig {
    /// Regional court code (e.g. "TRT2").
    pub court: String,
    /// Instance degree the configuration applies to.
    pub degree: Degree,
    /// Base URL of the portal.
    pub base_url: String,
    /// Login page URL.
    pub login_url: String,
    /// Human-readable court name for operator-facing output.
    pub display_name: String,
}
