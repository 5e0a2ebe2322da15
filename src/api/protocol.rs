use crate::view::DashboardView;
use serde::{Deserialize, Serialize};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Dashboard { version: u64, data: Box<DashboardView> },
    Pong { timestamp: String },
}

impl ServerMessage {
    pub fn dashboard(view: DashboardView) -> Self {
        ServerMessage::Dashboard {
            version: view.version,
            data: Box::new(view),
        }
    }

    pub fn pong() -> Self {
        ServerMessage::Pong {
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
