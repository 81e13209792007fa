//! Last-seen content of the remote log streams and line deltas between polls.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogStream {
    ErrorLog,
    ValidatorLog,
}

/// Whether hosts share one snapshot slot per stream or keep their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotScope {
    #[default]
    Global,
    PerHost,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotState {
    initialized: bool,
    last_content: String,
}

/// Result of feeding one snapshot into a [`SnapshotState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub delta: Vec<String>,
    pub first: bool,
    /// Byte-identical to the previous snapshot.
    pub unchanged: bool,
}

impl SnapshotState {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn last_content(&self) -> &str {
        &self.last_content
    }

    pub fn observe(&mut self, new_content: &str) -> Observation {
        if !self.initialized {
            self.initialized = true;
            self.last_content = new_content.to_string();
            return Observation {
                delta: Vec::new(),
                first: true,
                unchanged: false,
            };
        }
        let delta = line_delta(&self.last_content, new_content);
        let unchanged = self.last_content == new_content;
        self.last_content = new_content.to_string();
        Observation {
            delta,
            first: false,
            unchanged,
        }
    }
}

/// Lines of `new` whose exact text appears nowhere in `old`, in `new` order,
/// duplicates kept.
pub fn line_delta(old: &str, new: &str) -> Vec<String> {
    let seen: HashSet<&str> = old.split('\n').collect();
    new.split('\n')
        .filter(|line| !seen.contains(line))
        .map(str::to_string)
        .collect()
}

/// Snapshot slots shared by the scheduler and the HTTP trigger.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    scope: SnapshotScope,
    slots: Mutex<HashMap<(LogStream, String), SnapshotState>>,
}

impl SnapshotStore {
    pub fn new(scope: SnapshotScope) -> Self {
        Self {
            scope,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Compare-and-replace under one lock acquisition.
    pub async fn observe(&self, stream: LogStream, host: &str, content: &str) -> Observation {
        let key = match self.scope {
            SnapshotScope::Global => (stream, String::new()),
            SnapshotScope::PerHost => (stream, host.to_string()),
        };
        let mut slots = self.slots.lock().await;
        slots.entry(key).or_default().observe(content)
    }
}
