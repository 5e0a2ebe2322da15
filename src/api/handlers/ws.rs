use crate::api::protocol::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::config::DisplayConfig;
use crate::state::DashboardViewState;
use crate::view;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{Sink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Upgrade to a WebSocket that streams a fresh view after every state change
pub async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<AppState>>) -> Response {
    let client_id = uuid::Uuid::new_v4().to_string();
    let state_rx = app.state_rx.clone();
    let display = app.display.clone();

    ws.on_upgrade(move |socket| handle_connection(socket, state_rx, display, client_id))
}

async fn handle_connection(
    socket: WebSocket,
    mut state_rx: watch::Receiver<DashboardViewState>,
    display: DisplayConfig,
    client_id: String,
) {
    info!("WebSocket client connected: {}", client_id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Current view first, then one per committed change
    let mut outgoing = Some(current_view(&mut state_rx, &display));

    loop {
        if let Some(msg) = outgoing.take() {
            if let Err(e) = send_message(&mut ws_sender, &msg).await {
                error!("Failed to send message to WebSocket client {}: {}", client_id, e);
                break;
            }
        }

        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    info!("Dashboard session ended, closing client {}", client_id);
                    break;
                }
                outgoing = Some(current_view(&mut state_rx, &display));
            }
            incoming = ws_receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(ClientMessage::Ping) => {
                                debug!("Received ping from client {}", client_id);
                                outgoing = Some(ServerMessage::pong());
                            }
                            Err(e) => warn!("Ignoring client message from {}: {}", client_id, e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Client {} closed connection", client_id);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ping/pong frames are answered by axum; binary is unused
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error for client {}: {}", client_id, e);
                        break;
                    }
                }
            }
        }
    }

    info!("WebSocket client disconnected: {}", client_id);
}

fn current_view(
    state_rx: &mut watch::Receiver<DashboardViewState>,
    display: &DisplayConfig,
) -> ServerMessage {
    let state = state_rx.borrow_and_update();
    ServerMessage::dashboard(view::build(&state, display))
}

async fn send_message<S>(sender: &mut S, msg: &ServerMessage) -> Result<(), String>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sender
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| e.to_string())
}
