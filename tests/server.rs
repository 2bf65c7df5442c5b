mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::*;
use football_feed::server::{router, ROOT_MESSAGE};
use football_feed::{FeedService, League, ManualClock};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(upstream: FakeUpstream) -> Router {
    let upstream = Arc::new(upstream);
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    router(Arc::new(FeedService::new(
        upstream.clone(),
        upstream,
        clock,
        Duration::from_secs(300),
        Duration::from_secs(60),
    )))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn root_route_is_plain_text() {
    let (status, body) = get(app(FakeUpstream::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), ROOT_MESSAGE);
}

#[tokio::test]
async fn schedule_returns_camel_case_games() {
    let upstream = FakeUpstream::new().with_board(
        League::Ncaaf,
        date(2024, 9, 7),
        vec![event("401520281", at(2024, 9, 7, 23), "STATUS_SCHEDULED")],
    );

    let (status, body) = get_json(
        app(upstream),
        "/schedule?startDate=2024-09-05&league=ncaaf",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let games = body.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["id"], "401520281");
    assert_eq!(games[0]["league"], "NCAAF");
    assert_eq!(games[0]["homeTeam"], "Chiefs");
    assert_eq!(games[0]["awayFullName"], "Baltimore Ravens");
    assert_eq!(games[0]["status"], "Scheduled");
    assert_eq!(games[0]["date"], "2024-09-07T23:00:00Z");
}

#[tokio::test]
async fn schedule_parameter_errors() {
    let (status, body) = get_json(app(FakeUpstream::new()), "/schedule").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing startDate parameter");

    let (status, body) =
        get_json(app(FakeUpstream::new()), "/schedule?startDate=next-week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid startDate format");

    let (status, body) = get_json(
        app(FakeUpstream::new()),
        "/schedule?startDate=2024-09-05&league=NBA",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported league: NBA");
}

#[tokio::test]
async fn schedule_upstream_failure_is_500() {
    let (status, body) = get_json(
        app(FakeUpstream::new().broken(League::Nfl)),
        "/schedule?startDate=2024-09-05",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch schedule");
}

#[tokio::test]
async fn schedule_upcoming_only_switch() {
    let upstream = FakeUpstream::new().with_board(
        League::Nfl,
        date(2024, 9, 5),
        vec![
            event("1", at(2024, 9, 5, 1), "STATUS_FINAL"),
            event("2", at(2024, 9, 5, 20), "STATUS_SCHEDULED"),
        ],
    );
    let (status, body) = get_json(
        app(upstream),
        "/schedule?startDate=2024-09-05&upcomingOnly=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let games = body.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["id"], "2");
}

#[tokio::test]
async fn scores_returns_game_score() {
    let upstream = FakeUpstream::new().with_summary(
        League::Ncaaf,
        scored_event("401520281", &[0, 7, 6, 7], &[14, 7, 6, 7]),
    );

    let (status, body) = get_json(
        app(upstream),
        "/scores?eventId=401520281&startDate=2024-09-01&league=NFL",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "summary-fallback");
    assert_eq!(body["league"], "NCAAF");
    assert_eq!(body["fullTeam1"], "USC Trojans");
    assert_eq!(body["team1_abbr"], "USC");
    assert_eq!(body["team2_abbr"], "LSU");
    assert_eq!(body["completedQuarters"], 4);
    assert_eq!(body["completed"], true);
    assert_eq!(body["gameState"], "post");
    assert_eq!(body["quarterScores"][3]["quarter"], "Q4");
    assert_eq!(body["quarterScores"][3]["home"], 20);
    assert_eq!(body["quarterScores"][3]["away"], 34);
    assert_eq!(body["homeTeam"]["displayName"], "LSU Tigers");
}

#[tokio::test]
async fn scores_error_mapping() {
    let (status, body) = get_json(app(FakeUpstream::new()), "/scores?eventId=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing eventId or startDate");

    let (status, body) =
        get_json(app(FakeUpstream::new()), "/scores?startDate=2024-09-05").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing eventId or startDate");

    let (status, body) = get_json(
        app(FakeUpstream::new()),
        "/scores?eventId=1&startDate=2024-09-05",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Game not found");

    let (status, body) = get_json(
        app(FakeUpstream::new().broken(League::Nfl).broken(League::Ncaaf)),
        "/scores?eventId=1&startDate=2024-09-05",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch game");
}
