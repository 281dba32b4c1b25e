//! Static executor descriptions and live counters

use esclient_common::TimeValue;
use esclient_config::ExecutorKind;
use serde::Serialize;

/// Static description of one executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutorInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExecutorKind,
    /// Maximum number of tasks running at once
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<TimeValue>,
}

/// Description of every executor, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThreadPoolInfo {
    pub executors: Vec<ExecutorInfo>,
}

impl ThreadPoolInfo {
    pub fn executor(&self, name: &str) -> Option<&ExecutorInfo> {
        self.executors.iter().find(|info| info.name == name)
    }
}

/// Point-in-time counters of one executor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutorCounters {
    /// Tasks currently running
    pub active: usize,
    /// Tasks accepted but not yet started
    pub queue: usize,
    pub completed: u64,
    pub rejected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutorStats {
    pub name: String,
    #[serde(flatten)]
    pub counters: ExecutorCounters,
}

/// Counters of every executor, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThreadPoolStats {
    pub executors: Vec<ExecutorStats>,
}

impl ThreadPoolStats {
    pub fn executor(&self, name: &str) -> Option<&ExecutorCounters> {
        self.executors
            .iter()
            .find(|stats| stats.name == name)
            .map(|stats| &stats.counters)
    }
}
