use crate::config::AppConfig;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Request Counters (lock-free) ──

pub struct RequestCounters {
    pub greeks_computed: AtomicU64,
    pub assessments: AtomicU64,
    pub evaluations: AtomicU64,
    pub invalid_inputs: AtomicU64,
    pub rejected_requests: AtomicU64,
}

impl RequestCounters {
    pub fn new() -> Self {
        Self {
            greeks_computed: AtomicU64::new(0),
            assessments: AtomicU64::new(0),
            evaluations: AtomicU64::new(0),
            invalid_inputs: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            greeks_computed: self.greeks_computed.load(Ordering::Relaxed),
            assessments: self.assessments.load(Ordering::Relaxed),
            evaluations: self.evaluations.load(Ordering::Relaxed),
            invalid_inputs: self.invalid_inputs.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
        }
    }
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CountersSnapshot {
    pub greeks_computed: u64,
    pub assessments: u64,
    pub evaluations: u64,
    pub invalid_inputs: u64,
    pub rejected_requests: u64,
}

// ── Application shared state (immutable config + atomics, no locks) ──

pub struct AppState {
    pub config: AppConfig,
    pub counters: RequestCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            counters: RequestCounters::new(),
        })
    }
}
