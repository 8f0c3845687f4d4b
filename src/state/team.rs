use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// One of the two sides competing for votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// First team (`"team1"` on the wire).
    Team1,
    /// Second team (`"team2"` on the wire).
    Team2,
}

impl Team {
    /// Wire identifier of the team.
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Team1 => "team1",
            Team::Team2 => "team2",
        }
    }

    /// The opposing team.
    pub fn other(self) -> Team {
        match self {
            Team::Team1 => Team::Team2,
            Team::Team2 => Team::Team1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection returned when a caller names a team that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid team `{0}`: team must be 'team1' or 'team2'")]
pub struct InvalidTeam(pub String);

impl FromStr for Team {
    type Err = InvalidTeam;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "team1" => Ok(Team::Team1),
            "team2" => Ok(Team::Team2),
            other => Err(InvalidTeam(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_teams() {
        assert_eq!("team1".parse::<Team>(), Ok(Team::Team1));
        assert_eq!("team2".parse::<Team>(), Ok(Team::Team2));
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert_eq!(
            "team3".parse::<Team>(),
            Err(InvalidTeam("team3".to_owned()))
        );
        assert!("Team1".parse::<Team>().is_err());
        assert!("".parse::<Team>().is_err());
    }

    #[test]
    fn serializes_as_wire_identifier() {
        assert_eq!(serde_json::to_string(&Team::Team2).unwrap(), "\"team2\"");
        assert_eq!(Team::Team1.other(), Team::Team2);
    }
}
