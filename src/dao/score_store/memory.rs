use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::info;

use crate::{
    dao::{models::Scores, score_store::ScoreStore, storage::StorageResult},
    state::team::Team,
};

/// In-process counters; everything is lost on restart.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    scores: Arc<Mutex<Scores>>,
}

impl MemoryScoreStore {
    /// Build an empty store starting at 0/0.
    pub fn new() -> Self {
        info!("using in-memory score store (non-persistent)");
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn scores(&self) -> BoxFuture<'static, StorageResult<Scores>> {
        let scores = self.scores.clone();
        Box::pin(async move { Ok(*scores.lock().await) })
    }

    fn increment(&self, team: Team) -> BoxFuture<'static, StorageResult<Scores>> {
        let scores = self.scores.clone();
        Box::pin(async move {
            let mut guard = scores.lock().await;
            *guard.get_mut(team) += 1;
            Ok(*guard)
        })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<Scores>> {
        let scores = self.scores.clone();
        Box::pin(async move {
            let mut guard = scores.lock().await;
            *guard = Scores::ZERO;
            Ok(*guard)
        })
    }
}
