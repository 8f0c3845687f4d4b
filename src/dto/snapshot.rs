use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{
    match_machine::{MatchSnapshot, MatchStateKind},
    team::Team,
};

/// Phase label as sent to viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchStateLabel {
    /// Votes are accepted.
    Active,
    /// A team just won.
    Victory,
    /// Waiting for the automatic reset.
    Countdown,
}

impl From<MatchStateKind> for MatchStateLabel {
    fn from(kind: MatchStateKind) -> Self {
        match kind {
            MatchStateKind::Active => Self::Active,
            MatchStateKind::Victory => Self::Victory,
            MatchStateKind::Countdown => Self::Countdown,
        }
    }
}

/// Full match state, returned by the REST endpoints and pushed over the viewer WebSocket.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchStateMessage {
    /// Votes for team 1 in the current match.
    pub team1: u64,
    /// Votes for team 2 in the current match.
    pub team2: u64,
    /// Current phase.
    pub match_state: MatchStateLabel,
    /// Winner of the finished match, `null` while a match is running.
    pub winner: Option<Team>,
    /// Completed matches since the server started.
    pub matches_played: u64,
    /// Seconds until the next match starts; zero while a match is running.
    pub countdown: u64,
    /// Score that ends a match.
    pub win_score: u32,
}

impl From<&MatchSnapshot> for MatchStateMessage {
    fn from(snapshot: &MatchSnapshot) -> Self {
        Self {
            team1: snapshot.team1,
            team2: snapshot.team2,
            match_state: snapshot.state.into(),
            winner: snapshot.winner,
            matches_played: snapshot.matches_played,
            countdown: snapshot.countdown_remaining,
            win_score: snapshot.win_score,
        }
    }
}

impl From<MatchSnapshot> for MatchStateMessage {
    fn from(snapshot: MatchSnapshot) -> Self {
        Self::from(&snapshot)
    }
}
