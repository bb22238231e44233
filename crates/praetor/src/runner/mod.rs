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

//! Capture Runner Module
//!
//! The polling service that produces the scheduler tick: at each interval it
//! fetches due schedules and drives them through the
//! [`ScheduleExecutor`](crate::executor::ScheduleExecutor) with automatic
//! rescheduling, one schedule at a time. Each run is awaited to completion —
//! there is no fire-and-forget — so shutdown drains the schedule currently
//! in flight before the loop exits.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time;
use tracing::{debug, error, info};

use crate::executor::{ExecutionOptions, ScheduleExecutor};
use crate::stores::ScheduleStore;

/// Configuration for the capture runner.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CaptureRunnerConfig {
    poll_interval: Duration,
    due_batch_limit: usize,
}

impl CaptureRunnerConfig {
    /// Creates a new configuration builder with default values.
    pub fn builder() -> CaptureRunnerConfigBuilder {
        CaptureRunnerConfigBuilder::default()
    }

    /// How often the runner polls for due schedules.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Maximum number of due schedules fetched per tick.
    pub fn due_batch_limit(&self) -> usize {
        self.due_batch_limit
    }
}

impl Default for CaptureRunnerConfig {
    fn default() -> Self {
        CaptureRunnerConfigBuilder::default().build()
    }
}

/// Builder for [`CaptureRunnerConfig`].
#[derive(Debug, Clone)]
pub struct CaptureRunnerConfigBuilder {
    poll_interval: Duration,
    due_batch_limit: usize,
}

impl Default for CaptureRunnerConfigBuilder {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            due_batch_limit: 10,
        }
    }
}

impl CaptureRunnerConfigBuilder {
    /// Sets how often the runner polls for due schedules.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the maximum number of due schedules fetched per tick.
    pub fn due_batch_limit(mut self, limit: usize) -> Self {
        self.due_batch_limit = limit;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CaptureRunnerConfig {
        CaptureRunnerConfig {
            poll_interval: self.poll_interval,
            due_batch_limit: self.due_batch_limit,
        }
    }
}

/// Polls for due schedules and executes them.
pub struct CaptureRunner {
    executor: Arc<ScheduleExecutor>,
    schedules: Arc<dyn ScheduleStore>,
    config: CaptureRunnerConfig,
    shutdown: Notify,
}

impl CaptureRunner {
    /// Creates a runner over the given executor and schedule store.
    pub fn new(
        executor: Arc<ScheduleExecutor>,
        schedules: Arc<dyn ScheduleStore>,
        config: CaptureRunnerConfig,
    ) -> Self {
        Self {
            executor,
            schedules,
            config,
            shutdown: Notify::new(),
        }
    }

    /// Runs the polling loop until [`shutdown`](Self::shutdown) is called.
    ///
    /// Store failures while polling are logged and the loop continues on
    /// the next tick; they never terminate the runner.
    pub async fn run(&self) {
        info!(
            poll_interval_ms = self.config.poll_interval().as_millis() as u64,
            due_batch_limit = self.config.due_batch_limit(),
            "Starting capture runner"
        );
        let mut interval = time::interval(self.config.poll_interval());

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick().await;
                }
                _ = self.shutdown.notified() => {
                    info!("Capture runner shutting down");
                    break;
                }
            }
        }
    }

    /// Signals the polling loop to stop after the in-flight work drains.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    async fn tick(&self) {
        let now = Utc::now();
        let due = match self
            .schedules
            .list_due(now, self.config.due_batch_limit())
            .await
        {
            Ok(due) => due,
            Err(poll_error) => {
                error!(error = %poll_error, "Failed to poll due schedules");
                return;
            }
        };

        if due.is_empty() {
            debug!("No due schedules");
            return;
        }

        for schedule in due {
            let report = self
                .executor
                .execute(&schedule, ExecutionOptions::default())
                .await;
            info!(
                job_run_id = %report.run_id,
                schedule_id = %report.schedule_id,
                job_type = %report.job_type,
                status = %report.status,
                successes = report.successes(),
                errors = report.errors(),
                "Scheduled run completed"
            );
        }
    }
}
