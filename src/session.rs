use crate::config::PollingConfig;
use crate::diagnostics::Diagnostics;
use crate::poller::{spawn_poller, PredictionPoller, ReadingPoller};
use crate::state::DashboardViewState;
use crate::store::MeterStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Periods of the two independent pollers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub reading_every: Duration,
    pub prediction_every: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            reading_every: Duration::from_secs(3),
            prediction_every: Duration::from_secs(60),
        }
    }
}

impl From<&PollingConfig> for PollSchedule {
    fn from(config: &PollingConfig) -> Self {
        Self {
            reading_every: config.reading_interval(),
            prediction_every: config.prediction_interval(),
        }
    }
}

/// Owns the dashboard state for one device and hands out read-only subscriptions
pub struct DashboardSession {
    store: Arc<dyn MeterStore>,
    state: Arc<watch::Sender<DashboardViewState>>,
    diagnostics: Arc<Diagnostics>,
}

impl DashboardSession {
    pub fn new(store: Arc<dyn MeterStore>) -> Self {
        Self::opened_at(store, Utc::now())
    }

    pub fn opened_at(store: Arc<dyn MeterStore>, opened_at: DateTime<Utc>) -> Self {
        let (state, _rx) = watch::channel(DashboardViewState::new(opened_at));
        Self {
            store,
            state: Arc::new(state),
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// Receiver that observes every committed state
    pub fn subscribe(&self) -> watch::Receiver<DashboardViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardViewState {
        self.state.borrow().clone()
    }

    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        self.diagnostics.clone()
    }

    pub fn reading_poller(&self) -> ReadingPoller {
        ReadingPoller::new(
            self.store.clone(),
            self.state.clone(),
            self.diagnostics.clone(),
        )
    }

    pub fn prediction_poller(&self) -> PredictionPoller {
        PredictionPoller::new(
            self.store.clone(),
            self.state.clone(),
            self.diagnostics.clone(),
        )
    }

    /// Spawn both pollers; each runs once immediately and then on its own period
    pub fn start(&self, schedule: PollSchedule) -> SessionHandle {
        info!(
            reading_every_ms = schedule.reading_every.as_millis() as u64,
            prediction_every_ms = schedule.prediction_every.as_millis() as u64,
            "starting dashboard session"
        );

        SessionHandle {
            tasks: vec![
                spawn_poller(self.reading_poller(), schedule.reading_every),
                spawn_poller(self.prediction_poller(), schedule.prediction_every),
            ],
        }
    }
}

/// Running pollers; dropping or shutting down aborts them
pub struct SessionHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SessionHandle {
    /// Abort both pollers. An in-flight fetch is dropped and never commits.
    pub async fn shutdown(mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
            // Cancelled is the expected result here
            let _ = task.await;
        }
        info!("dashboard session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
