//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::team::Team;

/// Validates that a team identifier names one of the two competing teams.
///
/// # Examples
///
/// ```ignore
/// validate_team("team1") // Ok
/// validate_team("team3") // Err - unknown team
/// validate_team("TEAM1") // Err - identifiers are lowercase
/// ```
pub fn validate_team(team: &str) -> Result<(), ValidationError> {
    if let Err(err) = team.parse::<Team>() {
        let mut error = ValidationError::new("team");
        error.message = Some(err.to_string().into());
        return Err(error);
    }

    Ok(())
}
