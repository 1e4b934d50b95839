use std::time::Duration;

use serde::{Deserialize, Serialize};

const MAX_WORKER_THREADS: usize = 256;
const MAX_CONCURRENT_PREDICATES: usize = 4096;

pub const WORKER_THREADS_ENV: &str = "AD_TARGETING_WORKER_THREADS";
pub const MAX_CONCURRENT_PREDICATES_ENV: &str = "AD_TARGETING_MAX_CONCURRENT_PREDICATES";
pub const EVALUATION_TIMEOUT_ENV: &str = "AD_TARGETING_EVALUATION_TIMEOUT_MS";

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Threads backing the process-wide predicate worker pool.
    pub worker_threads: usize,
    /// Upper bound on predicate evaluations in flight across all callers.
    pub max_concurrent_predicates: usize,
    /// Optional per-group evaluation deadline. `None` waits unconditionally.
    pub evaluation_timeout_ms: Option<u64>,
}

impl EngineConfig {
    pub fn v0() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            max_concurrent_predicates: 64,
            evaluation_timeout_ms: None,
        }
    }

    /// `v0()` overlaid with the `AD_TARGETING_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::v0();
        let worker_threads = std::env::var(WORKER_THREADS_ENV).ok();
        let max_concurrent = std::env::var(MAX_CONCURRENT_PREDICATES_ENV).ok();
        let timeout = std::env::var(EVALUATION_TIMEOUT_ENV).ok();

        Self {
            worker_threads: parse_bounded(
                worker_threads.as_deref(),
                defaults.worker_threads,
                MAX_WORKER_THREADS,
            ),
            max_concurrent_predicates: parse_bounded(
                max_concurrent.as_deref(),
                defaults.max_concurrent_predicates,
                MAX_CONCURRENT_PREDICATES,
            ),
            evaluation_timeout_ms: parse_timeout(timeout.as_deref())
                .or(defaults.evaluation_timeout_ms),
        }
    }

    pub fn evaluation_timeout(&self) -> Option<Duration> {
        self.evaluation_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::v0()
    }
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn parse_bounded(raw: Option<&str>, default_value: usize, max: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, max)
}

fn parse_timeout(raw: Option<&str>) -> Option<u64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
}
