//! End-to-end season: snapshot on disk → store → engine → HTTP.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tower::ServiceExt;

use tourscore::api::build_router;
use tourscore::scoring::handicap::{HandicapCalculator, HandicapConfig};
use tourscore::scoring::ScoringEngine;
use tourscore::storage::{save_snapshot, SnapshotStore};
use tourscore::types::{ScoringError, StandingsScoring, TeamStatus};

use crate::fixtures::*;

fn temp_path() -> String {
    let mut p = std::env::temp_dir();
    p.push(format!("tourscore_season_{}.json", uuid::Uuid::new_v4()));
    p.to_string_lossy().to_string()
}

/// Writes the season to disk and loads it back, so every test goes
/// through the JSON format.
fn engine() -> ScoringEngine<SnapshotStore> {
    let path = temp_path();
    save_snapshot(&season(), &path).unwrap();
    let store = SnapshotStore::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    ScoringEngine::new(
        store,
        HandicapCalculator::new(HandicapConfig {
            index_range: Some((dec!(-10), dec!(54))),
            ..HandicapConfig::default()
        }),
    )
}

#[test]
fn test_round_one_leaderboard() {
    let board = engine().leaderboard(ROUND_ONE).unwrap();
    let order: Vec<i64> = board
        .entries
        .iter()
        .map(|e| e.participant.player_id.unwrap())
        .collect();
    assert_eq!(order, vec![BOB, DANA, ALICE, CARL]);

    // Tour scores both, so net figures and the stroke index are present
    assert!(board.stroke_index.is_some());

    let alice = &board.entries[2];
    assert_eq!(alice.total_shots, 84);
    assert_eq!(alice.relative_to_par, 12);
    // Women's rating: 10 × 125 / 113 + (74 − 72) = 13.06
    assert_eq!(alice.course_handicap, Some(13));
    assert_eq!(alice.net_total_shots, Some(71));
    assert_eq!(alice.net_relative_to_par, Some(-1));
    let strokes = alice.handicap_strokes_per_hole.as_ref().unwrap();
    assert_eq!(strokes.iter().sum::<i32>(), 13);

    let dana = &board.entries[1];
    assert_eq!(dana.holes_played, 18);
    assert_eq!(dana.total_shots, 80);
    assert_eq!(dana.net_total_shots, Some(72));
}

#[test]
fn test_round_two_in_progress_entries() {
    let board = engine().leaderboard(ROUND_TWO).unwrap();
    let dana = board
        .entries
        .iter()
        .find(|e| e.participant.player_id == Some(DANA))
        .unwrap();
    assert_eq!(dana.holes_played, 9);
    assert_eq!(dana.relative_to_par, 1);
    assert!(dana.net_total_shots.is_none());
    assert!(dana.net_relative_to_par.is_some());

    let carl = board
        .entries
        .iter()
        .find(|e| e.participant.player_id == Some(CARL))
        .unwrap();
    assert!(!carl.has_started());
    assert_eq!(carl.total_shots, 0);
}

#[test]
fn test_team_leaderboards() {
    let engine = engine();

    let round_one = engine.team_leaderboard(ROUND_ONE).unwrap();
    assert_eq!(round_one.len(), 2);
    assert_eq!(round_one[0].team_name, "Eagles");
    assert_eq!(round_one[0].total_relative_score, Some(15));
    assert_eq!(round_one[0].status, TeamStatus::Finished);
    // Two teams in the series, doubled: (2 + 2) × 2 and 2 × 2
    assert_eq!(round_one[0].team_points, Some(dec!(8)));
    assert_eq!(round_one[1].team_points, Some(dec!(4)));

    let round_two = engine.team_leaderboard(ROUND_TWO).unwrap();
    assert_eq!(round_two[0].team_name, "Eagles");
    assert_eq!(round_two[0].display_progress, "F");
    assert_eq!(round_two[1].status, TeamStatus::InProgress);
    assert_eq!(round_two[1].display_progress, "Thru 9");
    assert_eq!(round_two[1].total_relative_score, Some(1));

    let round_three = engine.team_leaderboard(ROUND_THREE).unwrap();
    assert_eq!(round_three[0].status, TeamStatus::NotStarted);
    assert_eq!(round_three[0].display_progress, "Starts 08:10");
    assert!(round_three[0].team_points.is_none());
}

#[test]
fn test_gross_standings() {
    let standings = engine().tour_standings(TOUR_ID, None, None, as_of()).unwrap();
    assert_eq!(standings.scoring_mode, StandingsScoring::Gross);
    // Round three is in the future with nobody finished
    assert_eq!(standings.total_competitions, 2);

    // Four active enrollments: 6, 4, 2, 1
    let table: Vec<_> = standings
        .player_standings
        .iter()
        .map(|p| (p.player_id, p.position, p.total_points, p.competitions_played))
        .collect();
    assert_eq!(
        table,
        vec![
            (BOB, 1, dec!(12), 2),
            (ALICE, 2, dec!(6), 2),
            (DANA, 3, dec!(4), 1),
            (CARL, 4, dec!(1), 1),
        ]
    );
}

#[test]
fn test_net_standings() {
    let standings = engine()
        .tour_standings(TOUR_ID, None, Some(StandingsScoring::Net), as_of())
        .unwrap();
    assert_eq!(standings.scoring_mode, StandingsScoring::Net);

    let order: Vec<i64> = standings.player_standings.iter().map(|p| p.player_id).collect();
    assert_eq!(order, vec![ALICE, CARL, BOB, DANA]);
    assert_eq!(standings.player_standings[0].total_points, dec!(10));

    let alice_round_two = standings.player_standings[0]
        .competitions
        .iter()
        .find(|c| c.competition_id == ROUND_TWO)
        .unwrap();
    assert_eq!(alice_round_two.position, 1);
    assert_eq!(alice_round_two.net_relative_to_par, Some(-8));
    assert_eq!(alice_round_two.relative_to_par, 5);
}

#[test]
fn test_unknown_ids() {
    let engine = engine();
    assert_eq!(
        engine.leaderboard(999).unwrap_err(),
        ScoringError::CompetitionNotFound { id: 999 }
    );
    assert_eq!(
        engine.tour_standings(999, None, None, as_of()).unwrap_err(),
        ScoringError::TourNotFound { id: 999 }
    );
}

#[tokio::test]
async fn test_http_standings_for_season() {
    let app = build_router(Arc::new(engine()));
    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/tours/{TOUR_ID}/standings?scoring=net"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["scoring_mode"], "net");
    assert_eq!(json["player_standings"][0]["player_name"], "Alice");
}
