//! Values produced by one health pass over the fleet.

pub const DEFAULT_USAGE_THRESHOLD: f64 = 80.0;

/// One successfully parsed host-status report.
#[derive(Debug, Clone, PartialEq)]
pub struct HostStatusSample {
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub disk_pct: f64,
    pub uptime: String,
}

impl HostStatusSample {
    // strictly greater: a value sitting exactly on the threshold is fine
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.cpu_pct > threshold || self.mem_pct > threshold || self.disk_pct > threshold
    }

    pub fn status_line(&self, index: usize) -> String {
        format!(
            "Server {index} - CPU Usage: {:.2}%, Memory Usage: {:.2}%, Disk Usage: {:.2}%, Uptime: {}",
            self.cpu_pct, self.mem_pct, self.disk_pct, self.uptime
        )
    }
}

/// Aggregation over one pass of the health check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub any_high_usage: bool,
    pub samples: Vec<HostStatusSample>,
}

impl CycleReport {
    pub fn record(&mut self, index: usize, sample: HostStatusSample, threshold: f64) {
        self.messages.push(sample.status_line(index));
        if sample.exceeds(threshold) {
            self.any_high_usage = true;
        }
        self.samples.push(sample);
    }

    pub fn summary(&self) -> String {
        format!("Health Check:\n{}", self.messages.join("\n"))
    }

    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(format!(
            "Errors occurred during health check:\n{}",
            self.errors.join("\n")
        ))
    }

    /// Mean (cpu, mem, disk) over the hosts that parsed this cycle.
    pub fn averages(&self) -> Option<(f64, f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;
        let (c, m, d) = self.samples.iter().fold((0.0, 0.0, 0.0), |acc, s| {
            (acc.0 + s.cpu_pct, acc.1 + s.mem_pct, acc.2 + s.disk_pct)
        });
        Some((c / n, m / n, d / n))
    }
}
