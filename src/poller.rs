//! Timer-driven fetch-and-commit tasks.
//!
//! Each poller performs one store round trip per tick and commits the result into
//! the shared state in a single `send_modify`, so readers never see a half-applied
//! update. Failures and empty results are logged, counted in [`Diagnostics`], and
//! otherwise leave the state exactly as it was; the next tick is the retry.

use crate::diagnostics::{Diagnostics, PollerKind};
use crate::normalize::{
    defaulted_prediction_fields, defaulted_reading_fields, normalize_prediction, normalize_reading,
    RawRecord,
};
use crate::state::{DashboardViewState, KwhTrend};
use crate::store::MeterStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Result of a single poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// State was replaced; carries the new state version
    Committed { version: u64 },
    /// The store answered with no rows
    Empty,
    /// The fetch failed; carries the error message
    Failed(String),
}

#[async_trait]
pub trait Poller: Send + Sync + 'static {
    fn kind(&self) -> PollerKind;

    async fn poll_once(&self) -> PollOutcome;
}

/// Run `poller` immediately and then every `period` until the task is aborted.
///
/// A slow poll delays only this poller's next tick.
pub fn spawn_poller<P: Poller>(poller: P, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let kind = poller.kind();
        info!(poller = %kind, period_ms = period.as_millis() as u64, "poller started");

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let outcome = poller.poll_once().await;
            debug!(poller = %kind, ?outcome, "poll finished");
        }
    })
}

/// Fetches the latest reading and feeds the history windows
#[derive(Clone)]
pub struct ReadingPoller {
    store: Arc<dyn MeterStore>,
    state: Arc<watch::Sender<DashboardViewState>>,
    diagnostics: Arc<Diagnostics>,
}

impl ReadingPoller {
    pub fn new(
        store: Arc<dyn MeterStore>,
        state: Arc<watch::Sender<DashboardViewState>>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            store,
            state,
            diagnostics,
        }
    }
}

#[async_trait]
impl Poller for ReadingPoller {
    fn kind(&self) -> PollerKind {
        PollerKind::Reading
    }

    async fn poll_once(&self) -> PollOutcome {
        let record = match self.store.latest_reading().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(poller = "reading", "store returned no readings");
                self.diagnostics.record_empty(PollerKind::Reading);
                return PollOutcome::Empty;
            }
            Err(e) => {
                warn!(poller = "reading", error = %e, "reading fetch failed, keeping previous state");
                let message = e.to_string();
                self.diagnostics.record_failure(PollerKind::Reading, &message);
                return PollOutcome::Failed(message);
            }
        };

        let defaulted = defaulted_reading_fields(&record);
        if !defaulted.is_empty() {
            debug!(poller = "reading", fields = ?defaulted, "defaulted missing reading fields");
            self.diagnostics.record_malformed(1);
        }

        let reading = normalize_reading(&record, Utc::now());
        let total_kwh = reading.total_kwh;

        let mut trend = KwhTrend::First;
        let mut version = 0;
        self.state.send_modify(|state| {
            trend = state.commit_reading(reading);
            version = state.version();
        });

        if let KwhTrend::Decreased { previous } = trend {
            warn!(
                poller = "reading",
                previous_kwh = previous,
                total_kwh,
                "cumulative energy decreased since the previous reading"
            );
            self.diagnostics.record_kwh_regression();
        }

        self.diagnostics.record_committed(PollerKind::Reading);
        debug!(poller = "reading", version, "reading committed");

        PollOutcome::Committed { version }
    }
}

/// Fetches the full prediction series and keeps the latest entry plus the recent window
pub struct PredictionPoller {
    store: Arc<dyn MeterStore>,
    state: Arc<watch::Sender<DashboardViewState>>,
    diagnostics: Arc<Diagnostics>,
    /// Length of the series seen on the previous successful fetch
    inspected_rows: AtomicUsize,
}

impl PredictionPoller {
    pub fn new(
        store: Arc<dyn MeterStore>,
        state: Arc<watch::Sender<DashboardViewState>>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            store,
            state,
            diagnostics,
            inspected_rows: AtomicUsize::new(0),
        }
    }

    /// Count malformed rows appended since the previous fetch.
    ///
    /// The series is append-only and oldest first; a shorter series than last
    /// time means rows were removed, so everything is inspected again.
    fn record_new_malformed(&self, records: &[RawRecord]) {
        let inspected = self.inspected_rows.swap(records.len(), Ordering::Relaxed);
        let new_from = if inspected <= records.len() { inspected } else { 0 };

        let malformed = records[new_from..]
            .iter()
            .filter(|record| !defaulted_prediction_fields(record).is_empty())
            .count();

        if malformed > 0 {
            debug!(poller = "prediction", rows = malformed, "defaulted fields in new prediction rows");
            self.diagnostics.record_malformed(malformed as u64);
        }
    }
}

#[async_trait]
impl Poller for PredictionPoller {
    fn kind(&self) -> PollerKind {
        PollerKind::Prediction
    }

    async fn poll_once(&self) -> PollOutcome {
        let records = match self.store.predictions().await {
            Ok(records) => records,
            Err(e) => {
                warn!(poller = "prediction", error = %e, "prediction fetch failed, keeping previous state");
                let message = e.to_string();
                self.diagnostics.record_failure(PollerKind::Prediction, &message);
                return PollOutcome::Failed(message);
            }
        };

        if records.is_empty() {
            debug!(poller = "prediction", "store returned no predictions");
            self.diagnostics.record_empty(PollerKind::Prediction);
            return PollOutcome::Empty;
        }

        self.record_new_malformed(&records);

        let fetched_at = Utc::now();
        let series: Vec<_> = records
            .iter()
            .map(|record| normalize_prediction(record, fetched_at))
            .collect();

        let mut version = 0;
        self.state.send_modify(|state| {
            state.commit_predictions(&series);
            version = state.version();
        });

        self.diagnostics.record_committed(PollerKind::Prediction);
        debug!(poller = "prediction", version, rows = series.len(), "predictions committed");

        PollOutcome::Committed { version }
    }
}
