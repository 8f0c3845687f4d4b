use axum::extract::ws::Message;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{dto::snapshot::MatchStateMessage, state::match_machine::MatchSnapshot};

#[derive(Clone)]
/// Handle used to push messages to a connected viewer.
pub struct ViewerConnection {
    /// Registry key of the viewer.
    pub id: Uuid,
    /// Sender feeding the socket writer task.
    pub tx: mpsc::UnboundedSender<Message>,
}

impl ViewerConnection {
    /// Allocate a fresh identifier for the sender feeding a socket writer.
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tx,
        }
    }
}

/// Delivery failure for a single viewer.
#[derive(Debug, Error)]
pub enum ViewerSendError {
    /// The socket writer is gone; the viewer should be dropped.
    #[error("viewer `{0}` connection closed")]
    ConnectionClosed(Uuid),
    /// The viewer is not registered (already disconnected or pruned).
    #[error("viewer `{0}` is not registered")]
    UnknownViewer(Uuid),
    /// The snapshot could not be encoded.
    #[error("failed to serialize match state")]
    Serialize(#[from] serde_json::Error),
}

/// Registry of live viewer sockets and snapshot fan-out.
#[derive(Default)]
pub struct ViewerHub {
    viewers: DashMap<Uuid, ViewerConnection>,
}

impl ViewerHub {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered viewers.
    pub fn count(&self) -> usize {
        self.viewers.len()
    }

    /// Add `viewer` to the broadcast set without sending anything yet.
    pub fn register(&self, viewer: ViewerConnection) -> Uuid {
        let id = viewer.id;
        self.viewers.insert(id, viewer);
        debug!(viewer = %id, active = self.count(), "viewer registered");
        id
    }

    /// Register `viewer` and immediately send it `current`.
    ///
    /// A viewer whose first send already fails is removed again.
    pub fn connect(
        &self,
        viewer: ViewerConnection,
        current: &MatchSnapshot,
    ) -> Result<(), ViewerSendError> {
        let id = self.register(viewer);

        let result = self.send_to(&id, current);
        if result.is_err() {
            self.disconnect(&id);
        }
        result
    }

    /// Remove a viewer; returns whether it was still registered.
    pub fn disconnect(&self, id: &Uuid) -> bool {
        let removed = self.viewers.remove(id).is_some();
        if removed {
            debug!(viewer = %id, active = self.count(), "viewer removed");
        }
        removed
    }

    /// Send `snapshot` to a single registered viewer.
    pub fn send_to(&self, id: &Uuid, snapshot: &MatchSnapshot) -> Result<(), ViewerSendError> {
        let payload = encode(snapshot)?;
        let tx = self
            .viewers
            .get(id)
            .map(|entry| entry.tx.clone())
            .ok_or(ViewerSendError::UnknownViewer(*id))?;

        tx.send(Message::Text(payload.into()))
            .map_err(|_| ViewerSendError::ConnectionClosed(*id))
    }

    /// Push `snapshot` to every registered viewer, pruning the ones that are gone.
    ///
    /// Returns the number of viewers the message was handed to. Failures never reach the caller.
    pub fn broadcast(&self, snapshot: &MatchSnapshot) -> usize {
        let payload = match encode(snapshot) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize match state for broadcast");
                return 0;
            }
        };

        // Copy the registry first so no shard lock is held while sending.
        let targets: Vec<ViewerConnection> = self
            .viewers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut dead = Vec::new();
        let mut delivered = 0;
        for viewer in targets {
            match viewer.tx.send(Message::Text(payload.clone().into())) {
                Ok(()) => delivered += 1,
                Err(_) => dead.push(viewer.id),
            }
        }

        if !dead.is_empty() {
            for id in &dead {
                self.viewers.remove(id);
            }
            debug!(dropped = dead.len(), active = self.count(), "dropped dead viewers");
        }

        delivered
    }
}

fn encode(snapshot: &MatchSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&MatchStateMessage::from(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{match_machine::MatchStateKind, team::Team};

    fn snapshot(team1: u64) -> MatchSnapshot {
        MatchSnapshot {
            team1,
            team2: 0,
            state: MatchStateKind::Active,
            winner: None::<Team>,
            matches_played: 0,
            countdown_remaining: 0,
            win_score: 100,
        }
    }

    fn text(message: Message) -> serde_json::Value {
        match message {
            Message::Text(payload) => serde_json::from_str(payload.as_str()).unwrap(),
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[test]
    fn connect_sends_current_snapshot_first() {
        let hub = ViewerHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        hub.connect(ViewerConnection::new(tx), &snapshot(7)).unwrap();

        assert_eq!(hub.count(), 1);
        assert_eq!(text(rx.try_recv().unwrap())["team1"], 7);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn connect_with_closed_socket_is_rolled_back() {
        let hub = ViewerHub::new();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let err = hub
            .connect(ViewerConnection::new(tx), &snapshot(0))
            .unwrap_err();
        assert!(matches!(err, ViewerSendError::ConnectionClosed(_)));
        assert_eq!(hub.count(), 0);
    }

    #[test]
    fn broadcast_reaches_everyone_and_prunes_dead_viewers() {
        let hub = ViewerHub::new();
        let (alive_tx, mut alive_rx) = mpsc::unbounded_channel();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();

        hub.connect(ViewerConnection::new(alive_tx), &snapshot(0))
            .unwrap();
        hub.connect(ViewerConnection::new(dead_tx), &snapshot(0))
            .unwrap();
        alive_rx.try_recv().unwrap();
        drop(dead_rx);

        assert_eq!(hub.broadcast(&snapshot(5)), 1);
        assert_eq!(hub.count(), 1);
        assert_eq!(text(alive_rx.try_recv().unwrap())["team1"], 5);

        assert_eq!(hub.broadcast(&snapshot(6)), 1);
        assert_eq!(text(alive_rx.try_recv().unwrap())["team1"], 6);
    }

    #[test]
    fn disconnect_is_idempotent() {
        let hub = ViewerHub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let viewer = ViewerConnection::new(tx);
        let id = viewer.id;

        hub.connect(viewer, &snapshot(0)).unwrap();
        assert!(hub.disconnect(&id));
        assert!(!hub.disconnect(&id));
        assert_eq!(hub.count(), 0);
        assert_eq!(hub.broadcast(&snapshot(1)), 0);
    }
}
