use crate::{
    dto::vote::VoteRequest,
    error::ServiceError,
    state::{MatchSnapshot, SharedState},
};

/// Current match state, read without side effects.
pub async fn current_state(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    state.matches().full_state().await
}

/// Register a vote and push the resulting state to every viewer.
///
/// Votes arriving while a match is over leave the scores untouched; the caller still gets
/// the current snapshot back but nothing is pushed, since that snapshot may already be
/// older than the reset broadcast.
pub async fn cast_vote(
    state: &SharedState,
    request: VoteRequest,
) -> Result<MatchSnapshot, ServiceError> {
    let team = request.team()?;
    let outcome = state.matches().record_vote(team).await?;
    if outcome.counted {
        state.viewers().broadcast(&outcome.snapshot);
    }
    Ok(outcome.snapshot)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::score_store::MemoryScoreStore,
        state::{AppState, MatchStateKind, viewers::ViewerConnection},
    };

    fn request(team: &str) -> VoteRequest {
        VoteRequest {
            team: team.to_owned(),
        }
    }

    #[tokio::test]
    async fn vote_is_broadcast_to_viewers() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryScoreStore::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let initial = current_state(&state).await.unwrap();
        state
            .viewers()
            .connect(ViewerConnection::new(tx), &initial)
            .unwrap();
        rx.recv().await.unwrap();

        let snapshot = cast_vote(&state, request("team2")).await.unwrap();
        assert_eq!((snapshot.team1, snapshot.team2), (0, 1));
        assert_eq!(snapshot.state, MatchStateKind::Active);
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_vote_is_not_pushed() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryScoreStore::new()));
        let win_score = state.matches().rules().win_score;
        for _ in 0..win_score {
            cast_vote(&state, request("team1")).await.unwrap();
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let over = current_state(&state).await.unwrap();
        state
            .viewers()
            .connect(ViewerConnection::new(tx), &over)
            .unwrap();
        rx.recv().await.unwrap();

        let ignored = cast_vote(&state, request("team2")).await.unwrap();
        assert_eq!(ignored.state, MatchStateKind::Countdown);
        assert_eq!(ignored.team2, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_team_never_reaches_the_store() {
        let state = AppState::new(AppConfig::default(), Arc::new(MemoryScoreStore::new()));

        let err = cast_vote(&state, request("team3")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let snapshot = current_state(&state).await.unwrap();
        assert_eq!((snapshot.team1, snapshot.team2), (0, 0));
    }
}
