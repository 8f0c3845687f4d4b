use std::{sync::Arc, time::Duration};

use axum::extract::ws::Message;
use futures::future::join_all;
use tokio::sync::mpsc;
use voting_war_back::{
    config::AppConfig,
    dao::score_store::MemoryScoreStore,
    dto::vote::VoteRequest,
    services::{health_service, heartbeat, vote_service},
    state::{AppState, MatchStateKind, SharedState, viewers::ViewerConnection},
};

fn vote(team: &str) -> VoteRequest {
    VoteRequest {
        team: team.to_owned(),
    }
}

fn decode(message: Message) -> serde_json::Value {
    match message {
        Message::Text(payload) => serde_json::from_str(payload.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn new_state() -> SharedState {
    AppState::new(AppConfig::default(), Arc::new(MemoryScoreStore::new()))
}

#[tokio::test(start_paused = true)]
async fn full_match_cycle_with_a_connected_viewer() {
    let state = new_state();
    let win_score = state.matches().rules().win_score;
    let countdown = state.matches().rules().countdown;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let initial = vote_service::current_state(&state).await.unwrap();
    state
        .viewers()
        .connect(ViewerConnection::new(tx), &initial)
        .unwrap();
    assert_eq!(decode(rx.recv().await.unwrap())["matchState"], "active");

    let health = health_service::health_status(&state);
    assert_eq!(health.db, "memory");
    assert_eq!(health.ws_clients, 1);

    // More votes than needed race for the last point; only `win_score` may count.
    let votes = (0..win_score + 20).map(|_| {
        let state = state.clone();
        tokio::spawn(async move { vote_service::cast_vote(&state, vote("team1")).await })
    });
    for result in join_all(votes).await {
        let snapshot = result.unwrap().unwrap();
        assert_eq!(snapshot.winner.is_some(), snapshot.state != MatchStateKind::Active);
    }

    let over = vote_service::current_state(&state).await.unwrap();
    assert_eq!(over.state, MatchStateKind::Countdown);
    assert_eq!(over.team1, u64::from(win_score));
    assert_eq!(over.team2, 0);
    assert_eq!(over.countdown_remaining, countdown.as_secs());

    let ignored = vote_service::cast_vote(&state, vote("team2")).await.unwrap();
    assert_eq!(ignored.team2, 0);

    // Drain the per-vote pushes, then wait for the reset push.
    while rx.try_recv().is_ok() {}
    tokio::time::sleep(countdown + Duration::from_millis(10)).await;

    let pushed = decode(rx.recv().await.unwrap());
    assert_eq!(pushed["matchState"], "active");
    assert_eq!(pushed["team1"], 0);
    assert_eq!(pushed["matchesPlayed"], 1);
    assert!(pushed["winner"].is_null());

    let next = vote_service::cast_vote(&state, vote("team2")).await.unwrap();
    assert_eq!((next.team1, next.team2), (0, 1));
    assert_eq!(next.matches_played, 1);
}

#[tokio::test(start_paused = true)]
async fn heartbeat_recovers_a_missed_update() {
    let state = new_state();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let initial = vote_service::current_state(&state).await.unwrap();
    state
        .viewers()
        .connect(ViewerConnection::new(tx), &initial)
        .unwrap();
    rx.recv().await.unwrap();

    // A vote handled by the manager directly is never pushed explicitly.
    state
        .matches()
        .handle_vote("team2".parse().unwrap())
        .await
        .unwrap();
    assert!(rx.try_recv().is_err());

    let task = tokio::spawn(heartbeat::run(
        state.matches().clone(),
        state.viewers().clone(),
        state.broadcast_interval(),
        state.shutdown_watcher(),
    ));

    let refreshed = decode(rx.recv().await.unwrap());
    assert_eq!(refreshed["team2"], 1);

    state.begin_shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn rejected_vote_leaves_state_untouched() {
    let state = new_state();
    assert!(vote_service::cast_vote(&state, vote("spectators")).await.is_err());

    let snapshot = vote_service::current_state(&state).await.unwrap();
    assert_eq!((snapshot.team1, snapshot.team2), (0, 0));
    assert_eq!(snapshot.state, MatchStateKind::Active);
}
