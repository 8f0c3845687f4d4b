use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, watch},
    time::{Instant, sleep, sleep_until, timeout},
};
use tracing::{debug, error, info, warn};

use crate::{
    dao::{score_store::ScoreStore, storage::StorageResult},
    error::ServiceError,
    state::{
        match_machine::{MatchEvent, MatchMachine, MatchSnapshot},
        team::Team,
        viewers::ViewerHub,
        wait_for_shutdown,
    },
};

const RESET_RETRY_INITIAL: Duration = Duration::from_secs(1);
const RESET_RETRY_MAX: Duration = Duration::from_secs(10);

/// Rules shared by every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Score that ends a match.
    pub win_score: u32,
    /// Time the winner stays on display before scores reset.
    pub countdown: Duration,
    /// Upper bound for a single score store call made under the match lock.
    pub store_timeout: Duration,
}

/// Result of a vote together with whether it changed the scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    /// State right after the vote.
    pub snapshot: MatchSnapshot,
    /// `false` when the vote arrived while the match was over.
    pub counted: bool,
}

/// Authoritative owner of the match lifecycle.
///
/// Every score-affecting operation runs under one mutex held across the store call, so two
/// votes can never both observe an open match and push it past the winning score.
#[derive(Clone)]
pub struct MatchManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    store: Arc<dyn ScoreStore>,
    rules: MatchRules,
    machine: Mutex<MatchMachine>,
    viewers: Arc<ViewerHub>,
    shutdown: watch::Receiver<bool>,
}

impl MatchManager {
    /// Build a manager starting a fresh match; `shutdown` cancels pending countdowns.
    pub fn new(
        store: Arc<dyn ScoreStore>,
        rules: MatchRules,
        viewers: Arc<ViewerHub>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                store,
                rules,
                machine: Mutex::new(MatchMachine::new()),
                viewers,
                shutdown,
            }),
        }
    }

    /// Rules this manager enforces.
    pub fn rules(&self) -> MatchRules {
        self.inner.rules
    }

    /// Identifier of the score store backend.
    pub fn store_backend(&self) -> &'static str {
        self.inner.store.backend()
    }

    /// Register a vote for `team` and return the resulting snapshot.
    ///
    /// Votes arriving while the match is over are ignored and answered with the current state.
    pub async fn handle_vote(&self, team: Team) -> Result<MatchSnapshot, ServiceError> {
        self.record_vote(team).await.map(|outcome| outcome.snapshot)
    }

    /// Same as [`MatchManager::handle_vote`], also telling whether the vote was counted.
    pub async fn record_vote(&self, team: Team) -> Result<VoteOutcome, ServiceError> {
        let mut machine = self.inner.machine.lock().await;

        if !machine.accepts_votes() {
            debug!(%team, "vote ignored; match is not active");
            let scores = self.bounded("scores", self.inner.store.scores()).await?;
            return Ok(VoteOutcome {
                snapshot: machine.snapshot(scores, Instant::now(), self.inner.rules.win_score),
                counted: false,
            });
        }

        let scores = self
            .bounded("increment", self.inner.store.increment(team))
            .await?;

        if let Some(winner) = scores.winner(self.inner.rules.win_score, team) {
            machine.apply(MatchEvent::Won(winner))?;
            info!(
                %winner,
                team1 = scores.team1,
                team2 = scores.team2,
                round = machine.matches_played() + 1,
                "match won"
            );

            let ends_at = Instant::now() + self.inner.rules.countdown;
            machine.apply(MatchEvent::CountdownStarted { ends_at })?;
            self.spawn_countdown(ends_at);
        }

        Ok(VoteOutcome {
            snapshot: machine.snapshot(scores, Instant::now(), self.inner.rules.win_score),
            counted: true,
        })
    }

    /// Current scores merged with the match fields.
    ///
    /// The store read happens under the match lock, so the counters and the phase always
    /// describe the same instant.
    pub async fn full_state(&self) -> Result<MatchSnapshot, ServiceError> {
        let machine = self.inner.machine.lock().await;
        let scores = self.bounded("scores", self.inner.store.scores()).await?;
        Ok(machine.snapshot(scores, Instant::now(), self.inner.rules.win_score))
    }

    /// Await a store call for at most `store_timeout` so the match lock is always released.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        work: impl Future<Output = StorageResult<T>>,
    ) -> Result<T, ServiceError> {
        let limit = self.inner.rules.store_timeout;
        match timeout(limit, work).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(
                    operation,
                    backend = self.store_backend(),
                    limit = ?limit,
                    "score store call timed out"
                );
                Err(ServiceError::Timeout)
            }
        }
    }

    fn spawn_countdown(&self, ends_at: Instant) {
        let manager = self.clone();
        let mut shutdown = self.inner.shutdown.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = sleep_until(ends_at) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    debug!("countdown cancelled by shutdown");
                    return;
                }
            }

            manager.finish_match(&mut shutdown).await;
        });
    }

    /// Reset the store and reopen voting, retrying until the store accepts the reset.
    async fn finish_match(&self, shutdown: &mut watch::Receiver<bool>) {
        let mut delay = RESET_RETRY_INITIAL;

        loop {
            match self.reset_match().await {
                Ok(snapshot) => {
                    info!(round = snapshot.matches_played + 1, "match reset; new match started");
                    return;
                }
                Err(ServiceError::InvalidState(message)) => {
                    error!(%message, "countdown fired outside of the countdown phase");
                    return;
                }
                Err(err) => {
                    warn!(error = %err, retry_in = ?delay, "failed to reset scores; retrying");
                    tokio::select! {
                        _ = sleep(delay) => {}
                        _ = wait_for_shutdown(shutdown) => return,
                    }
                    delay = (delay * 2).min(RESET_RETRY_MAX);
                }
            }
        }
    }

    /// Reset under the lock and push the fresh match before any later vote can be answered.
    async fn reset_match(&self) -> Result<MatchSnapshot, ServiceError> {
        let mut machine = self.inner.machine.lock().await;
        let scores = self.bounded("reset", self.inner.store.reset()).await?;
        machine.apply(MatchEvent::CountdownElapsed)?;
        let snapshot = machine.snapshot(scores, Instant::now(), self.inner.rules.win_score);
        self.inner.viewers.broadcast(&snapshot);
        Ok(snapshot)
    }
}
