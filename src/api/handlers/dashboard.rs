use crate::api::AppState;
use crate::diagnostics::DiagnosticsSnapshot;
use crate::view::{self, DashboardView};
use axum::{extract::State, response::Json};
use std::sync::Arc;

/// Current view model, rebuilt from the latest committed state
pub async fn get_dashboard(State(app): State<Arc<AppState>>) -> Json<DashboardView> {
    let view = {
        let state = app.state_rx.borrow();
        view::build(&state, &app.display)
    };
    Json(view)
}

pub async fn get_diagnostics(State(app): State<Arc<AppState>>) -> Json<DiagnosticsSnapshot> {
    Json(app.diagnostics.snapshot())
}
