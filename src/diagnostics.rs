use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Which poller an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerKind {
    Reading,
    Prediction,
}

impl PollerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PollerKind::Reading => "reading",
            PollerKind::Prediction => "prediction",
        }
    }
}

impl std::fmt::Display for PollerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct PollerCounters {
    committed: AtomicU64,
    empty: AtomicU64,
    failed: AtomicU64,
    last_error: Mutex<Option<String>>,
}

impl PollerCounters {
    fn snapshot(&self) -> PollerSnapshot {
        PollerSnapshot {
            committed: self.committed.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }
}

/// Counters for everything the dashboard otherwise handles silently
#[derive(Debug, Default)]
pub struct Diagnostics {
    reading: PollerCounters,
    prediction: PollerCounters,
    /// Rows that needed field defaulting, each counted on first sight
    malformed_records: AtomicU64,
    kwh_regressions: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollerSnapshot {
    pub committed: u64,
    pub empty: u64,
    pub failed: u64,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsSnapshot {
    pub reading: PollerSnapshot,
    pub prediction: PollerSnapshot,
    pub malformed_records: u64,
    pub kwh_regressions: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self, kind: PollerKind) -> &PollerCounters {
        match kind {
            PollerKind::Reading => &self.reading,
            PollerKind::Prediction => &self.prediction,
        }
    }

    pub fn record_committed(&self, kind: PollerKind) {
        self.counters(kind).committed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty(&self, kind: PollerKind) {
        self.counters(kind).empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: PollerKind, error: &str) {
        let counters = self.counters(kind);
        counters.failed.fetch_add(1, Ordering::Relaxed);
        *counters
            .last_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(error.to_string());
    }

    pub fn record_malformed(&self, rows: u64) {
        self.malformed_records.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn record_kwh_regression(&self) {
        self.kwh_regressions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            reading: self.reading.snapshot(),
            prediction: self.prediction.snapshot(),
            malformed_records: self.malformed_records.load(Ordering::Relaxed),
            kwh_regressions: self.kwh_regressions.load(Ordering::Relaxed),
        }
    }
}
