use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the score backend in use and the number of connected viewers.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.matches().store_backend(), state.viewers().count())
}
