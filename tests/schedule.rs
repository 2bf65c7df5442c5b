mod common;

use common::*;
use football_feed::{Config, FeedError, FeedService, League, ManualClock, NormalizedStatus};
use std::sync::Arc;
use std::time::Duration;

fn service(upstream: Arc<FakeUpstream>, clock: Arc<ManualClock>) -> FeedService {
    FeedService::new(
        upstream.clone(),
        upstream,
        clock,
        Duration::from_secs(300),
        Duration::from_secs(60),
    )
}

fn week_one() -> FakeUpstream {
    FakeUpstream::new()
        .with_board(
            League::Nfl,
            date(2024, 9, 5),
            vec![event("401671789", at(2024, 9, 6, 0), "STATUS_SCHEDULED")],
        )
        .with_board(
            League::Nfl,
            date(2024, 9, 7),
            vec![event("401671801", at(2024, 9, 7, 17), "STATUS_SCHEDULED")],
        )
        .with_board(
            League::Nfl,
            date(2024, 9, 8),
            vec![
                event("401671801", at(2024, 9, 8, 17), "STATUS_SCHEDULED"),
                event("401671805", at(2024, 9, 8, 20), "STATUS_SCHEDULED"),
            ],
        )
}

#[tokio::test]
async fn duplicate_id_kept_at_first_day() {
    let upstream = Arc::new(week_one());
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    let service = service(upstream.clone(), clock);

    let games = service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();

    let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["401671789", "401671801", "401671805"]);
    assert_eq!(games[1].date, at(2024, 9, 7, 17));
    assert_eq!(games[0].league, League::Nfl);
    assert_eq!(games[0].home_team, "Chiefs");
    assert_eq!(games[0].away_full_name.as_deref(), Some("Baltimore Ravens"));
    assert_eq!(upstream.calls("scoreboard", League::Nfl), 7);
}

#[tokio::test]
async fn repeated_query_served_from_cache() {
    let upstream = Arc::new(week_one());
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    let service = service(upstream.clone(), clock.clone());

    let first = service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();
    clock.advance(chrono::Duration::minutes(4));
    let second = service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(upstream.total_calls(), 7);

    // A different league or start date is its own entry
    service
        .schedule(date(2024, 9, 5), League::Ncaaf, false)
        .await
        .unwrap();
    service
        .schedule(date(2024, 9, 6), League::Nfl, false)
        .await
        .unwrap();
    assert_eq!(upstream.total_calls(), 21);
}

#[tokio::test]
async fn stale_week_is_refetched_within_ttl() {
    let upstream = Arc::new(week_one());
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    let service = FeedService::new(
        upstream.clone(),
        upstream.clone(),
        clock.clone(),
        Duration::from_secs(30 * 24 * 60 * 60),
        Duration::from_secs(60),
    );

    service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();
    clock.advance(chrono::Duration::days(6));
    service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();
    assert_eq!(upstream.total_calls(), 7);

    clock.advance(chrono::Duration::days(2));
    service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap();
    assert_eq!(upstream.total_calls(), 14);
}

#[tokio::test]
async fn upcoming_only_filters_cached_list() {
    let upstream = Arc::new(
        FakeUpstream::new().with_board(
            League::Ncaaf,
            date(2024, 9, 5),
            vec![
                event("1", at(2024, 9, 5, 1), "STATUS_FINAL"),
                event("2", at(2024, 9, 5, 11), "STATUS_IN_PROGRESS"),
                event("3", at(2024, 9, 5, 23), "STATUS_POSTPONED"),
                event("4", at(2024, 9, 5, 23), "STATUS_SCHEDULED"),
                event("5", at(2024, 9, 4, 23), "NS"),
            ],
        ),
    );
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    let service = service(upstream.clone(), clock);

    let upcoming = service
        .schedule(date(2024, 9, 5), League::Ncaaf, true)
        .await
        .unwrap();
    let ids: Vec<&str> = upcoming.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);

    let all = service
        .schedule(date(2024, 9, 5), League::Ncaaf, false)
        .await
        .unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[4].status, NormalizedStatus::Final);
    assert_eq!(upstream.total_calls(), 7);
}

#[tokio::test]
async fn failed_day_fails_the_window() {
    let upstream = Arc::new(week_one().broken(League::Nfl));
    let clock = Arc::new(ManualClock::new(at(2024, 9, 5, 12)));
    let service = service(upstream, clock);

    let err = service
        .schedule(date(2024, 9, 5), League::Nfl, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::UpstreamUnavailable(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn mock_mode_reads_schedule_file() {
    let path = std::env::temp_dir().join(format!("football_feed_mock_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "errors": [],
            "response": [
                {
                    "game": {"id": 9001, "date": {"date": "2099-09-05", "time": "20:20"}, "status": {"short": "NS"}},
                    "teams": {"home": {"id": 1, "name": "Kansas City Chiefs"}, "away": {"id": 2, "name": "Baltimore Ravens"}}
                },
                {
                    "game": {"id": 9002, "status": {"short": "NS"}},
                    "teams": {"home": {"name": "Green Bay Packers"}, "away": {"name": "Philadelphia Eagles"}}
                }
            ]
        }"#,
    )
    .unwrap();

    let config = Config {
        mock_mode: true,
        mock_schedule_path: path.clone(),
        ..Config::default()
    };
    let service = FeedService::from_config(&config);

    let games = service
        .schedule(date(2099, 9, 5), League::Nfl, false)
        .await
        .unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].home_team, "Kansas City Chiefs");
    assert_eq!(games[0].date, at(2099, 9, 5, 20) + chrono::Duration::minutes(20));
    assert_eq!(games[0].status, NormalizedStatus::Scheduled);
    assert_eq!(games[1].date, at(2099, 9, 5, 0));

    std::fs::remove_file(&path).ok();

    let missing = FeedService::from_config(&Config {
        mock_mode: true,
        mock_schedule_path: path,
        ..Config::default()
    });
    let err = missing
        .schedule(date(2099, 9, 5), League::Nfl, false)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
}
