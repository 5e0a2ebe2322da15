pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feedback;
pub mod history;
pub mod models;
pub mod normalize;
pub mod poller;
pub mod session;
pub mod state;
pub mod store;
pub mod view;

// Re-export commonly used items
pub use api::{create_router, AppState};
pub use config::Config;
pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use error::{AppError, Result};
pub use session::{DashboardSession, PollSchedule, SessionHandle};
pub use state::DashboardViewState;
pub use store::{MeterStore, PostgrestStore};
pub use view::DashboardView;
