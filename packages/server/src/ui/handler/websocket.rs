//! WebSocket connection handlers.
//!
//! One connection goes `Connecting → Open → Closed`. The upgrade registers the
//! participant, every inbound frame is decoded once into a [`ClientMessage`],
//! and the close path runs exactly once when either side of the socket ends.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ForwardError, ParticipantId, ParticipantName},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::{DisconnectError, RenameError, SendTapError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This is the only writer of the socket. The hub never awaits the network, so a
/// slow client only grows its own queue.
///
/// # Arguments
///
/// * `rx` - Channel receiver for serialized events addressed to this client
/// * `sender` - WebSocket sink to send messages to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop<S>(mut rx: mpsc::UnboundedReceiver<String>, mut sender: S) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that reads frames from this client and dispatches them.
///
/// Ends when the client closes the socket or the transport fails.
fn receiver_loop<R>(mut receiver: R, state: Arc<AppState>, id: ParticipantId) -> JoinHandle<()>
where
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error for participant {}: {}", id, e);
                    break;
                }
            };

            let decoded = match &msg {
                Message::Text(text) => ClientMessage::decode(text.as_str().as_bytes()),
                Message::Binary(bytes) => ClientMessage::decode(&bytes[..]),
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Message::Close(_) => {
                    tracing::debug!("Participant {} requested close", id);
                    break;
                }
            };

            match decoded {
                Ok(message) => dispatch(&state, id, message).await,
                Err(e) => {
                    tracing::warn!("Dropping malformed message from participant {}: {}", id, e);
                }
            }
        }
    })
}

/// Run the use case for one inbound event inside a dispatch turn.
async fn dispatch(state: &AppState, id: ParticipantId, message: ClientMessage) {
    let _turn = state.dispatch.lock().await;

    match message {
        ClientMessage::Tap { key } => {
            match state.send_tap_usecase.execute(id, key.into()).await {
                Ok(outcome) => {
                    tracing::info!(
                        "Tap from {} (id {}), delivered to {} client(s)",
                        outcome.participant.name,
                        id,
                        outcome.delivered
                    );
                    tokio::spawn(report_forward(id, outcome.forward));
                }
                Err(SendTapError::ParticipantNotFound(_)) => {
                    tracing::debug!("Ignoring tap from disconnected participant {}", id);
                }
            }
        }
        ClientMessage::SetName { name } => {
            match state
                .rename_participant_usecase
                .execute(id, ParticipantName::new(name))
                .await
            {
                Ok(participant) => {
                    tracing::info!("Participant {} renamed to \"{}\"", id, participant.name);
                }
                Err(RenameError::ParticipantNotFound(_)) => {
                    tracing::debug!("Ignoring rename from disconnected participant {}", id);
                }
            }
        }
        ClientMessage::Unknown => {
            tracing::debug!("Ignoring message of unknown type from participant {}", id);
        }
    }
}

/// Log the outcome of a downstream forward. Failures are not retried.
async fn report_forward(id: ParticipantId, forward: JoinHandle<Result<(), ForwardError>>) {
    match forward.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("UDP forward for participant {} failed: {}", id, e),
        Err(e) => tracing::error!("UDP forward task for participant {} panicked: {}", id, e),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    serve_connection(sender, receiver, state).await;
}

/// Drive one connection from registration to its single disconnect.
///
/// The close path runs once, whichever side ends first: the client closing or
/// failing (`recv_task`) or a write to the client failing (`send_task`).
async fn serve_connection<S, R>(sender: S, receiver: R, state: Arc<AppState>)
where
    S: Sink<Message> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Connecting → Open
    let participant = {
        let _turn = state.dispatch.lock().await;
        match state.connect_participant_usecase.execute(tx).await {
            Ok(participant) => participant,
            Err(e) => {
                tracing::warn!("Failed to open connection: {}", e);
                return;
            }
        }
    };
    let id = participant.id;
    tracing::info!("{} connected (id {})", participant.name, id);

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), id);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Open → Closed
    let _turn = state.dispatch.lock().await;
    match state.disconnect_participant_usecase.execute(id).await {
        Ok(remaining) => {
            tracing::info!("Participant {} disconnected ({} remaining)", id, remaining);
        }
        Err(DisconnectError::NotConnected(_)) => {
            tracing::debug!("Participant {} was already removed", id);
        }
    }
}
