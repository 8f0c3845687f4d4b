use serde::{Deserialize, Serialize};

use crate::state::team::Team;

/// Persisted counter pair, one vote count per team.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scores {
    /// Votes collected by the first team.
    pub team1: u64,
    /// Votes collected by the second team.
    pub team2: u64,
}

impl Scores {
    /// Both counters at zero.
    pub const ZERO: Scores = Scores { team1: 0, team2: 0 };

    /// Current count for `team`.
    pub fn get(&self, team: Team) -> u64 {
        match team {
            Team::Team1 => self.team1,
            Team::Team2 => self.team2,
        }
    }

    /// Mutable access to the counter of `team`.
    pub fn get_mut(&mut self, team: Team) -> &mut u64 {
        match team {
            Team::Team1 => &mut self.team1,
            Team::Team2 => &mut self.team2,
        }
    }

    /// Return the team that reached `win_score`, checking `preferred` first.
    ///
    /// Only one counter moves per vote, so `preferred` is the voted team; the other
    /// side is only consulted when the store was already past the threshold.
    pub fn winner(&self, win_score: u32, preferred: Team) -> Option<Team> {
        let threshold = u64::from(win_score);
        [preferred, preferred.other()]
            .into_iter()
            .find(|team| self.get(*team) >= threshold)
    }
}
