use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{SharedState, viewers::ViewerConnection};

/// Handle the full lifecycle for an individual viewer WebSocket connection.
///
/// The viewer gets the current match state right away, then every broadcast until it leaves.
/// Inbound frames only serve as liveness signals.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps socket writes out of the broadcast path.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let Some(viewer_id) = join_viewer(&state, outbound_tx.clone()).await else {
        let _ = outbound_tx.send(Message::Close(None));
        finalize(writer_task, outbound_tx).await;
        return;
    };
    info!(id = %viewer_id, active = state.viewers().count(), "viewer connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(id = %viewer_id, payload = %text, "viewer keep-alive");
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                debug!(id = %viewer_id, error = %err, "viewer websocket error");
                break;
            }
        }
    }

    state.viewers().disconnect(&viewer_id);
    info!(id = %viewer_id, active = state.viewers().count(), "viewer disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Register the viewer, then send it the current state.
///
/// Registering first means a broadcast racing the join still reaches the viewer, and the
/// state read afterwards is never older than that broadcast.
pub async fn join_viewer(
    state: &SharedState,
    outbound_tx: mpsc::UnboundedSender<Message>,
) -> Option<Uuid> {
    let viewer_id = state
        .viewers()
        .register(ViewerConnection::new(outbound_tx));

    match state.matches().full_state().await {
        Ok(current) => match state.viewers().send_to(&viewer_id, &current) {
            Ok(()) => return Some(viewer_id),
            Err(err) => {
                info!(id = %viewer_id, error = %err, "viewer left before the initial state was sent");
            }
        },
        Err(err) => {
            warn!(id = %viewer_id, error = %err, "failed to read match state for new viewer");
        }
    }

    state.viewers().disconnect(&viewer_id);
    None
}

async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
