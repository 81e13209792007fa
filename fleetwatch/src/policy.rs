//! The three per-cycle checks and the rules deciding what gets reported where.
//!
//! Local-only output goes through `tracing`; anything an operator must act on
//! goes through the [`Notifier`].

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::notifier::Notifier;
use crate::parser::parse_host_status;
use crate::runner::{CommandRunner, RunError};
use crate::snapshot::{LogStream, SnapshotStore};
use crate::types::CycleReport;

pub struct Monitor {
    config: Config,
    runner: Arc<dyn CommandRunner>,
    notifier: Arc<dyn Notifier>,
    snapshots: SnapshotStore,
}

impl Monitor {
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>, notifier: Arc<dyn Notifier>) -> Self {
        let snapshots = SnapshotStore::new(config.snapshot_scope);
        Self {
            config,
            runner,
            notifier,
            snapshots,
        }
    }

    /// Health, then error log, then validator log.
    pub async fn run_cycle(&self) {
        self.check_health().await;
        self.check_error_logs().await;
        self.check_validator_logs().await;
    }

    pub async fn check_health(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for (i, host) in self.config.hosts.iter().enumerate() {
            let index = i + 1;
            let output = match self.runner.run(&self.config.health_command_for(host)).await {
                Ok(out) => out,
                Err(RunError::Timeout) => {
                    warn!(server = index, %host, "health command timed out");
                    self.notifier
                        .send(&format!("Error: SSH command to server {index} timed out"))
                        .await;
                    continue;
                }
                Err(e) => {
                    report
                        .errors
                        .push(format!("Error running SSH command for server {index}: {e}"));
                    continue;
                }
            };

            match parse_host_status(&output) {
                Ok(sample) => report.record(index, sample, self.config.usage_threshold),
                Err(e) => report
                    .errors
                    .push(format!("Error parsing SSH output for server {index}: {e}")),
            }
        }

        let summary = report.summary();
        if report.any_high_usage {
            self.notifier
                .send(&format!("Warning: High resource usage detected!\n{summary}"))
                .await;
        } else {
            info!("{summary}");
        }
        if let Some((cpu, mem, disk)) = report.averages() {
            debug!(
                hosts = report.samples.len(),
                "average usage: cpu {cpu:.2}%, memory {mem:.2}%, disk {disk:.2}%"
            );
        }
        if let Some(errors) = report.error_summary() {
            self.notifier.send(&errors).await;
        }
        report
    }

    pub async fn check_error_logs(&self) {
        for host in &self.config.hosts {
            let output = match self.runner.run(&self.config.error_log_command_for(host)).await {
                Ok(out) => out,
                Err(e) => {
                    error!(%host, "error log command failed: {e}");
                    continue;
                }
            };

            let obs = self.snapshots.observe(LogStream::ErrorLog, host, &output).await;
            if obs.first {
                debug!(%host, "error log baseline recorded");
                continue;
            }
            if obs.delta.is_empty() {
                info!(%host, "No changes detected in log.");
                continue;
            }
            let entries = obs.delta.join("\n");
            info!(%host, "new error log entries:\n{entries}");
            self.notifier
                .send(&format!(
                    "New log entries detected on server controller@{host}:\n{entries}"
                ))
                .await;
        }
    }

    pub async fn check_validator_logs(&self) {
        for host in &self.config.hosts {
            let output = match self
                .runner
                .run(&self.config.validator_log_command_for(host))
                .await
            {
                Ok(out) => out,
                Err(e) => {
                    error!(%host, "validator log command failed: {e}");
                    continue;
                }
            };

            let obs = self
                .snapshots
                .observe(LogStream::ValidatorLog, host, &output)
                .await;
            if obs.first {
                debug!(%host, "validator log baseline recorded");
                continue;
            }
            // a validator that wrote nothing new since the last poll is presumed stalled
            if obs.delta.is_empty() {
                warn!(%host, unchanged = obs.unchanged, "validator log did not advance");
                self.notifier
                    .send(&format!(
                        "Error: Validator is not functioning on server controller@{host}."
                    ))
                    .await;
                continue;
            }
            info!(%host, "validator log:\n{}", obs.delta.join("\n"));
        }
    }
}
