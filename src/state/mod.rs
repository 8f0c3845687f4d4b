/// Pure match lifecycle.
pub mod match_machine;
/// Lock-guarded match authority.
pub mod match_manager;
/// Team identifiers.
pub mod team;
/// Viewer registry and fan-out.
pub mod viewers;

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{config::AppConfig, dao::score_store::ScoreStore};

pub use self::match_machine::{MatchSnapshot, MatchStateKind};
pub use self::match_manager::{MatchManager, MatchRules, VoteOutcome};
use self::viewers::ViewerHub;

/// Reference-counted handle shared with every handler and task.
pub type SharedState = Arc<AppState>;

/// Central application state wiring the match authority to the viewer registry.
pub struct AppState {
    config: AppConfig,
    matches: MatchManager,
    viewers: Arc<ViewerHub>,
    shutdown: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, store: Arc<dyn ScoreStore>) -> SharedState {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let viewers = Arc::new(ViewerHub::new());
        let matches = MatchManager::new(store, config.match_rules(), viewers.clone(), shutdown_rx);

        Arc::new(Self {
            config,
            matches,
            viewers,
            shutdown: shutdown_tx,
        })
    }

    /// Loaded runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The authoritative match manager.
    pub fn matches(&self) -> &MatchManager {
        &self.matches
    }

    /// Registry of connected viewer sockets.
    pub fn viewers(&self) -> &Arc<ViewerHub> {
        &self.viewers
    }

    /// Cadence of the periodic state rebroadcast.
    pub fn broadcast_interval(&self) -> Duration {
        self.config.broadcast_interval()
    }

    /// Subscribe to the shutdown flag observed by background tasks.
    pub fn shutdown_watcher(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Ask every background task (heartbeat, countdown) to stop without side effects.
    pub fn begin_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}

/// Resolve once shutdown has been requested or the flag's owner is gone.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
