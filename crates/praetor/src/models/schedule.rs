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

//! Schedule Domain Model
//!
//! This module defines the [`Schedule`] entity and its supporting types: the
//! closed [`JobType`] enumeration, the pending-filings [`PendingFilter`]
//! sub-filters with their canonical execution order, and the [`Recurrence`]
//! descriptor together with the next-execution computation.
//!
//! Schedules are created and edited externally; the orchestrator mutates only
//! `last_execution` and `next_execution` through the
//! [`ScheduleStore`](crate::stores::ScheduleStore).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Closed set of capture job types.
///
/// Each variant maps to exactly one registered
/// [`CaptureExecutor`](crate::dispatcher::CaptureExecutor); the orchestrator
/// never branches on job type outside the dispatcher's strategy table.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    /// Full case-docket capture.
    FullDocket,
    /// Archived-case capture.
    ArchivedCases,
    /// Hearings capture over a date range.
    Hearings,
    /// Pending-filings capture, iterated per sub-filter.
    PendingFilings,
    /// Combined capture executed as a single portal session.
    Combined,
}

impl JobType {
    /// Stable string form used in evidence entries and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullDocket => "full-docket",
            JobType::ArchivedCases => "archived-cases",
            JobType::Hearings => "hearings",
            JobType::PendingFilings => "pending-filings",
            JobType::Combined => "combined",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-filters of a pending-filings capture.
///
/// Each requested sub-filter is executed as an independent attempt; the
/// canonical execution order is no-deadline before within-deadline.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingFilter {
    /// Filings with no response deadline attached.
    NoDeadline,
    /// Filings whose response deadline is still open.
    WithinDeadline,
}

impl PendingFilter {
    /// Canonical execution order for pending-filing sub-filters.
    pub const CANONICAL_ORDER: [PendingFilter; 2] =
        [PendingFilter::NoDeadline, PendingFilter::WithinDeadline];

    /// Stable string form used in evidence entries and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingFilter::NoDeadline => "no-deadline",
            PendingFilter::WithinDeadline => "within-deadline",
        }
    }

    /// Normalizes a requested sub-filter set into execution order.
    ///
    /// Duplicates collapse to one execution each and the result follows
    /// [`Self::CANONICAL_ORDER`] regardless of input ordering. An empty
    /// request defaults to no-deadline alone.
    pub fn canonicalize(requested: &[PendingFilter]) -> Vec<PendingFilter> {
        if requested.is_empty() {
            return vec![PendingFilter::NoDeadline];
        }
        Self::CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|filter| requested.contains(filter))
            .collect()
    }
}

impl fmt::Display for PendingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence periodicity of a schedule.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
    /// Fixed interval in days, carried in [`Recurrence::interval_days`].
    Custom,
}

/// Errors produced when a recurrence descriptor cannot yield a next execution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("custom periodicity requires intervalDays")]
    MissingInterval,

    #[error("intervalDays must be at least 1, got {0}")]
    InvalidInterval(u32),
}

/// Recurrence descriptor of a schedule.
///
/// Serializes as `{"periodicity": "daily", "timeOfDay": "08:00"}`, with
/// `intervalDays` present only for custom periodicity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub periodicity: Periodicity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_days: Option<u32>,
    #[serde(with = "time_of_day_format")]
    pub time_of_day: NaiveTime,
}

impl Recurrence {
    /// Recurrence step in whole days.
    pub fn step_days(&self) -> Result<u32, RecurrenceError> {
        match self.periodicity {
            Periodicity::Daily => Ok(1),
            Periodicity::Weekly => Ok(7),
            Periodicity::Custom => match self.interval_days {
                Some(days) if days >= 1 => Ok(days),
                Some(days) => Err(RecurrenceError::InvalidInterval(days)),
                None => Err(RecurrenceError::MissingInterval),
            },
        }
    }

    /// Computes the next execution instant strictly after `now`.
    ///
    /// The next occurrence is the first `time_of_day` instant after `now`
    /// reachable in whole-step increments from `now`'s date: a daily 08:00
    /// schedule executed at 09:00 yields 08:00 on the following day.
    pub fn next_after(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, RecurrenceError> {
        let step = Duration::days(i64::from(self.step_days()?));
        let mut candidate = now.date_naive().and_time(self.time_of_day).and_utc();
        while candidate <= now {
            candidate += step;
        }
        Ok(candidate)
    }
}

/// Serialization of `time_of_day` as "HH:MM".
mod time_of_day_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Inclusive date range for hearings captures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Job-type-specific extra parameters carried by a schedule.
///
/// Only the fields relevant to the schedule's job type are populated; the
/// dispatcher ignores the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraParams {
    /// Date range for hearings captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hearing_range: Option<DateRange>,
    /// Requested pending-filing sub-filters, normalized by the dispatcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_filters: Option<Vec<PendingFilter>>,
}

/// A scheduled capture job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Unique identifier of the schedule.
    pub id: Uuid,
    /// Tenant (attorney) that owns the schedule.
    pub tenant_id: Uuid,
    /// Capture job type executed on every run.
    pub job_type: JobType,
    /// Credentials the run spans; resolution is all-or-nothing.
    pub credential_ids: Vec<Uuid>,
    /// Recurrence descriptor driving next-execution computation.
    pub recurrence: Recurrence,
    /// Completion time of the most recent run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution: Option<DateTime<Utc>>,
    /// Next planned execution; strictly after the prior run's completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_execution: Option<DateTime<Utc>>,
    /// Job-type-specific parameters.
    #[serde(default)]
    pub params: ExtraParams,
}
