use thiserror::Error;
use tokio::time::Instant;

use crate::{dao::models::Scores, state::team::Team};

/// Lifecycle phases of a single match.
///
/// The winner lives inside the non-active variants, so a phase can never carry a winner
/// while votes are open nor lose it while the match is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPhase {
    /// Votes are accepted.
    Active,
    /// A team reached the winning score; the countdown has not been armed yet.
    Victory {
        /// Team that reached the winning score first.
        winner: Team,
    },
    /// Winner is on display while the next match is being prepared.
    Countdown {
        /// Team that won the finished match.
        winner: Team,
        /// Instant at which scores reset and a new match begins.
        ends_at: Instant,
    },
}

/// Coarse phase label exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStateKind {
    /// Votes are accepted.
    Active,
    /// A winner was just decided.
    Victory,
    /// Waiting for the automatic reset.
    Countdown,
}

impl MatchPhase {
    /// Coarse label of the phase.
    pub fn kind(&self) -> MatchStateKind {
        match self {
            MatchPhase::Active => MatchStateKind::Active,
            MatchPhase::Victory { .. } => MatchStateKind::Victory,
            MatchPhase::Countdown { .. } => MatchStateKind::Countdown,
        }
    }

    /// Winner of the current match, if it is over.
    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchPhase::Active => None,
            MatchPhase::Victory { winner } | MatchPhase::Countdown { winner, .. } => Some(*winner),
        }
    }
}

/// Events that can be applied to the match state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// A vote pushed `Team` to the winning score.
    Won(Team),
    /// The post-victory countdown was armed.
    CountdownStarted {
        /// Instant at which the countdown expires.
        ends_at: Instant,
    },
    /// The countdown expired and scores were reset.
    CountdownElapsed,
}

/// Error returned when an event does not apply to the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the machine was in when the event arrived.
    pub from: MatchPhase,
    /// Rejected event.
    pub event: MatchEvent,
}

/// Point-in-time view of the match, merged with the store counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
    /// Votes of the first team.
    pub team1: u64,
    /// Votes of the second team.
    pub team2: u64,
    /// Current phase label.
    pub state: MatchStateKind,
    /// Winner of the current match, set iff `state` is not active.
    pub winner: Option<Team>,
    /// Completed matches since the process started.
    pub matches_played: u64,
    /// Whole seconds left before the automatic reset (rounded up).
    pub countdown_remaining: u64,
    /// Score a team has to reach to win.
    pub win_score: u32,
}

impl MatchSnapshot {
    /// Counters carried by the snapshot.
    pub fn scores(&self) -> Scores {
        Scores {
            team1: self.team1,
            team2: self.team2,
        }
    }
}

/// Authoritative match lifecycle: active, victory, countdown, back to active.
#[derive(Debug, Clone)]
pub struct MatchMachine {
    phase: MatchPhase,
    matches_played: u64,
}

impl Default for MatchMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchMachine {
    /// Start with an open first match.
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::Active,
            matches_played: 0,
        }
    }

    /// Number of completed matches.
    pub fn matches_played(&self) -> u64 {
        self.matches_played
    }

    /// Whether a vote may touch the counters right now.
    pub fn accepts_votes(&self) -> bool {
        matches!(self.phase, MatchPhase::Active)
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: MatchEvent) -> Result<&MatchPhase, InvalidTransition> {
        let next = match (&self.phase, &event) {
            (MatchPhase::Active, MatchEvent::Won(team)) => MatchPhase::Victory { winner: *team },
            (MatchPhase::Victory { winner }, MatchEvent::CountdownStarted { ends_at }) => {
                MatchPhase::Countdown {
                    winner: *winner,
                    ends_at: *ends_at,
                }
            }
            (MatchPhase::Countdown { .. }, MatchEvent::CountdownElapsed) => {
                self.matches_played += 1;
                MatchPhase::Active
            }
            _ => {
                return Err(InvalidTransition {
                    from: self.phase.clone(),
                    event: event.clone(),
                });
            }
        };

        self.phase = next;
        Ok(&self.phase)
    }

    /// Seconds left in the countdown at `now`, rounded up; zero outside the countdown.
    pub fn countdown_remaining(&self, now: Instant) -> u64 {
        let MatchPhase::Countdown { ends_at, .. } = &self.phase else {
            return 0;
        };
        let left = ends_at.saturating_duration_since(now);
        left.as_secs() + u64::from(left.subsec_nanos() > 0)
    }

    /// Merge the machine fields with `scores` into a snapshot taken at `now`.
    pub fn snapshot(&self, scores: Scores, now: Instant, win_score: u32) -> MatchSnapshot {
        MatchSnapshot {
            team1: scores.team1,
            team2: scores.team2,
            state: self.phase.kind(),
            winner: self.phase.winner(),
            matches_played: self.matches_played,
            countdown_remaining: self.countdown_remaining(now),
            win_score,
        }
    }
}
