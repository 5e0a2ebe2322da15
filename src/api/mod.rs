pub mod handlers;
pub mod protocol;
pub mod routes;

pub use protocol::{ClientMessage, ServerMessage};
pub use routes::create_router;

use crate::config::DisplayConfig;
use crate::diagnostics::Diagnostics;
use crate::state::DashboardViewState;
use std::sync::Arc;
use tokio::sync::watch;

/// Read-only handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub state_rx: watch::Receiver<DashboardViewState>,
    pub display: DisplayConfig,
    pub diagnostics: Arc<Diagnostics>,
}

impl AppState {
    pub fn new(
        state_rx: watch::Receiver<DashboardViewState>,
        display: DisplayConfig,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            state_rx,
            display,
            diagnostics,
        }
    }
}
