mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use actix_web::web;
use common::*;
use cricket_league::AppState;
use serde_json::{json, Value};

async fn schedule(state: &web::Data<AppState>, team1: &str, team2: &str) -> (StatusCode, Value) {
    send(
        state,
        TestRequest::post().uri("/admin/matches").set_json(json!({
            "matchNumber": 1,
            "round": "Group A",
            "team1Id": team1,
            "team2Id": team2,
            "venue": "Church Grounds",
            "scheduledAt": "2025-02-01T09:30:00Z"
        })),
    )
    .await
}

async fn scheduled_match(state: &web::Data<AppState>) -> (String, String, String) {
    let team1 = confirmed_team(state, "Home Side").await;
    let team2 = confirmed_team(state, "Away Side").await;
    let (status, body) = schedule(state, &team1, &team2).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let match_id = body["data"]["matchId"].as_str().unwrap().to_string();
    (match_id, team1, team2)
}

async fn put(state: &web::Data<AppState>, uri: String, body: Value) -> (StatusCode, Value) {
    send(state, TestRequest::put().uri(&uri).set_json(body)).await
}

#[actix_web::test]
async fn test_full_match_lifecycle() {
    let (state, _) = test_state();
    let (match_id, team1, team2) = scheduled_match(&state).await;

    let (status, body) = put(
        &state,
        format!("/admin/matches/{match_id}/start"),
        json!({ "tossWinnerId": team1, "tossDecision": "bowl" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "live");
    assert_eq!(body["data"]["battingFirstId"], team2);

    let (status, body) = put(
        &state,
        format!("/admin/matches/{match_id}/first-innings"),
        json!({ "runs": 142, "wickets": 8 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["team2Runs"], 142);
    assert_eq!(body["data"]["status"], "first_innings_complete");

    let (status, body) = put(
        &state,
        format!("/admin/matches/{match_id}/second-innings"),
        json!({ "runs": 143, "wickets": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["team1Runs"], 143);

    let (status, body) = send(
        &state,
        TestRequest::put().uri(&format!("/admin/matches/{match_id}/finish")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];
    assert_eq!(data["status"], "completed");
    assert_eq!(data["winnerId"], team1);
    assert_eq!(data["margin"], 6);
    assert_eq!(data["marginType"], "wickets");
    assert_eq!(data["team1Name"], "Home Side");
    assert_eq!(data["team2Name"], "Away Side");

    let (status, body) = send(&state, TestRequest::get().uri(&format!("/api/matches/{match_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["winnerId"], team1);
}

#[actix_web::test]
async fn test_defending_side_wins_by_runs() {
    let (state, _) = test_state();
    let (match_id, team1, _) = scheduled_match(&state).await;

    put(
        &state,
        format!("/admin/matches/{match_id}/start"),
        json!({ "tossWinnerId": team1, "tossDecision": "bat" }),
    )
    .await;
    put(
        &state,
        format!("/admin/matches/{match_id}/first-innings"),
        json!({ "runs": 180, "wickets": 6 }),
    )
    .await;
    put(
        &state,
        format!("/admin/matches/{match_id}/second-innings"),
        json!({ "runs": 150, "wickets": 10 }),
    )
    .await;
    let (status, body) = send(
        &state,
        TestRequest::put().uri(&format!("/admin/matches/{match_id}/finish")),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["winnerId"], team1);
    assert_eq!(body["data"]["margin"], 30);
    assert_eq!(body["data"]["marginType"], "runs");
}

#[actix_web::test]
async fn test_same_team_cannot_play_itself() {
    let (state, _) = test_state();
    let team = confirmed_team(&state, "Lonely XI").await;
    let (status, body) = schedule(&state, &team, &team).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_unknown_team_cannot_be_scheduled() {
    let (state, _) = test_state();
    let team = confirmed_team(&state, "Real Team").await;
    let (status, body) = schedule(&state, &team, "TEAM-GHOST0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Team not found");
}

#[actix_web::test]
async fn test_pending_team_cannot_be_scheduled() {
    let (state, _) = test_state();
    let confirmed = confirmed_team(&state, "Ready Team").await;
    let pending = register_team(&state, "Waiting Team").await;
    let (status, _) = schedule(&state, &confirmed, &pending).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_innings_out_of_order_conflicts() {
    let (state, _) = test_state();
    let (match_id, _, _) = scheduled_match(&state).await;

    let (status, body) = put(
        &state,
        format!("/admin/matches/{match_id}/first-innings"),
        json!({ "runs": 100, "wickets": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &state,
        TestRequest::put().uri(&format!("/admin/matches/{match_id}/finish")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_toss_winner_must_be_playing() {
    let (state, _) = test_state();
    let (match_id, _, _) = scheduled_match(&state).await;

    let (status, _) = put(
        &state,
        format!("/admin/matches/{match_id}/start"),
        json!({ "tossWinnerId": "TEAM-OTHER0", "tossDecision": "bat" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&state, TestRequest::get().uri(&format!("/api/matches/{match_id}"))).await;
    assert_eq!(body["data"]["status"], "scheduled");
}

#[actix_web::test]
async fn test_more_than_ten_wickets_is_rejected() {
    let (state, _) = test_state();
    let (match_id, team1, _) = scheduled_match(&state).await;
    put(
        &state,
        format!("/admin/matches/{match_id}/start"),
        json!({ "tossWinnerId": team1, "tossDecision": "bat" }),
    )
    .await;

    let (status, body) = put(
        &state,
        format!("/admin/matches/{match_id}/first-innings"),
        json!({ "runs": 120, "wickets": 11 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send(&state, TestRequest::get().uri(&format!("/api/matches/{match_id}"))).await;
    assert_eq!(body["data"]["status"], "live");
}

#[actix_web::test]
async fn test_unknown_match_is_not_found() {
    let (state, _) = test_state();
    let (status, body) = send(&state, TestRequest::get().uri("/api/matches/no-such-match")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Match not found");
}

#[actix_web::test]
async fn test_match_list_carries_team_names() {
    let (state, _) = test_state();
    let (match_id, _, _) = scheduled_match(&state).await;

    let (status, body) = send(&state, TestRequest::get().uri("/api/matches")).await;
    assert_eq!(status, StatusCode::OK);
    let games = body["data"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["matchId"], match_id);
    assert_eq!(games[0]["team1Name"], "Home Side");
    assert_eq!(games[0]["round"], "Group A");
}
