use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_team,
    state::team::{InvalidTeam, Team},
};

/// Body of `POST /api/vote`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct VoteRequest {
    /// `"team1"` or `"team2"`.
    #[validate(custom(function = "validate_team"))]
    pub team: String,
}

impl VoteRequest {
    /// Typed team named by the request.
    pub fn team(&self) -> Result<Team, InvalidTeam> {
        self.team.parse()
    }
}
