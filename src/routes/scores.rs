use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{snapshot::MatchStateMessage, vote::VoteRequest},
    error::AppError,
    services::vote_service,
    state::SharedState,
};

/// Routes exposing the match state and accepting votes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/scores", get(get_scores))
        .route("/vote", post(vote))
}

#[utoipa::path(
    get,
    path = "/api/scores",
    tag = "match",
    responses(
        (status = 200, description = "Current match state", body = MatchStateMessage),
        (status = 500, description = "Score store unavailable"),
        (status = 503, description = "Score store timed out")
    )
)]
/// Return the current scores together with the match phase, winner and countdown.
pub async fn get_scores(
    State(state): State<SharedState>,
) -> Result<Json<MatchStateMessage>, AppError> {
    let snapshot = vote_service::current_state(&state)
        .await
        .map_err(|err| AppError::from_service(err, "failed to retrieve scores"))?;
    Ok(Json(snapshot.into()))
}

#[utoipa::path(
    post,
    path = "/api/vote",
    tag = "match",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote processed; ignored while the match is over", body = MatchStateMessage),
        (status = 400, description = "Unknown team"),
        (status = 500, description = "Score store unavailable"),
        (status = 503, description = "Score store timed out")
    )
)]
/// Add one vote to a team and broadcast the new state to every viewer when it counted.
pub async fn vote(
    State(state): State<SharedState>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<MatchStateMessage>, AppError> {
    payload.validate()?;
    let snapshot = vote_service::cast_vote(&state, payload)
        .await
        .map_err(|err| AppError::from_service(err, "failed to register vote"))?;
    Ok(Json(snapshot.into()))
}
