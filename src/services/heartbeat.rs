use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, warn};

use crate::state::{MatchManager, viewers::ViewerHub, wait_for_shutdown};

/// Periodically rebroadcast the match state so late joiners and viewers that missed a push
/// converge, whether or not anything changed.
///
/// Runs until shutdown is requested.
pub async fn run(
    matches: MatchManager,
    viewers: Arc<ViewerHub>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = wait_for_shutdown(&mut shutdown) => break,
        }

        if viewers.count() == 0 {
            continue;
        }

        match matches.full_state().await {
            Ok(snapshot) => {
                viewers.broadcast(&snapshot);
            }
            Err(err) => warn!(error = %err, "failed to read match state for heartbeat"),
        }
    }

    debug!("heartbeat stopped");
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        dao::score_store::MemoryScoreStore,
        state::{MatchRules, team::Team, viewers::ViewerConnection},
    };

    fn countdown_of(message: Message) -> u64 {
        let Message::Text(payload) = message else {
            panic!("expected text frame");
        };
        let value: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();
        assert_eq!(value["matchState"], "countdown");
        value["countdown"].as_u64().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn late_viewer_follows_the_countdown() {
        let hub = Arc::new(ViewerHub::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let matches = MatchManager::new(
            Arc::new(MemoryScoreStore::new()),
            MatchRules {
                win_score: 2,
                countdown: Duration::from_secs(8),
                store_timeout: Duration::from_secs(5),
            },
            hub.clone(),
            shutdown_rx.clone(),
        );

        matches.handle_vote(Team::Team2).await.unwrap();
        matches.handle_vote(Team::Team2).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.connect(ViewerConnection::new(tx), &matches.full_state().await.unwrap())
            .unwrap();
        let on_connect = countdown_of(rx.recv().await.unwrap());
        assert_eq!(on_connect, 6);

        let period = Duration::from_secs(1);
        let heartbeat = tokio::spawn(run(matches.clone(), hub.clone(), period, shutdown_rx));

        // The first tick fires immediately, later ones once per period.
        let first = countdown_of(rx.recv().await.unwrap());
        let second = countdown_of(rx.recv().await.unwrap());
        assert_eq!(first, on_connect);
        assert!(second < first);

        shutdown_tx.send(true).unwrap();
        heartbeat.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn idle_hub_skips_reads_and_stops_on_shutdown() {
        let hub = Arc::new(ViewerHub::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let matches = MatchManager::new(
            Arc::new(MemoryScoreStore::new()),
            MatchRules {
                win_score: 5,
                countdown: Duration::from_secs(1),
                store_timeout: Duration::from_secs(5),
            },
            hub.clone(),
            shutdown_rx.clone(),
        );

        let heartbeat = tokio::spawn(run(matches, hub, Duration::from_millis(100), shutdown_rx));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!heartbeat.is_finished());

        shutdown_tx.send(true).unwrap();
        heartbeat.await.unwrap();
    }
}
