//! Scripted collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use fleetwatch::config::Config;
use fleetwatch::notifier::Notifier;
use fleetwatch::policy::Monitor;
use fleetwatch::runner::{CommandRunner, RunError};

pub const HOST_1: &str = "10.0.0.1";
pub const HOST_2: &str = "10.0.0.2";

/// Replays queued results per exact command string; records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, RunError>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn push(&self, command: &str, result: Result<String, RunError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str) -> Result<String, RunError> {
        self.calls.lock().unwrap().push(command.to_string());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(command)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(|| Err(RunError::Failure(format!("unscripted: {command}"))))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) {
        self.sent.lock().unwrap().push(text.to_string());
    }
}

pub fn health_cmd(host: &str) -> String {
    format!("health {host}")
}

pub fn error_log_cmd(host: &str) -> String {
    format!("errlog {host}")
}

pub fn validator_log_cmd(host: &str) -> String {
    format!("vallog {host}")
}

pub fn config(hosts: &[&str]) -> Config {
    Config {
        hosts: hosts.iter().map(|h| h.to_string()).collect(),
        health_command: "health %s".into(),
        error_log_command: "errlog %s".into(),
        validator_log_command: "vallog %s".into(),
        ..Config::default()
    }
}

pub fn monitor(
    cfg: Config,
) -> (Monitor, Arc<ScriptedRunner>, Arc<RecordingNotifier>) {
    let runner = Arc::new(ScriptedRunner::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let m = Monitor::new(cfg, runner.clone(), notifier.clone());
    (m, runner, notifier)
}

pub const UPTIME: &str = " 12:34:56 up 1 day,  3:04,  1 user,  load average: 0.00, 0.01, 0.05";

/// Output shaped like `uptime; top -bn1 | head -3; free -m; df -h /`.
pub fn status_output(cpu: f64, mem: f64, disk: f64) -> String {
    let used = mem * 100.0;
    [
        String::new(),
        UPTIME.to_string(),
        "Tasks: 120 total,   1 running, 119 sleeping".to_string(),
        format!("%Cpu(s): {cpu:.2} us,  1.0 sy,  0.0 ni, 80.0 id,  0.0 wa,  0.0 hi,  0.0 si,  0.0 st"),
        String::new(),
        "               total        used        free      shared  buff/cache   available".to_string(),
        format!("Mem:           10000 {used:>11.0}        1000         100        2000        6000"),
        "Swap:           2048           0        2048".to_string(),
        String::new(),
        "Filesystem      Size  Used Avail Use% Mounted on".to_string(),
        format!("/dev/sda1       100G   45G   55G  {disk:.0}% /"),
        String::new(),
    ]
    .join("\n")
}
