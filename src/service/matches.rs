use crate::error::ApiError;
use crate::model::cricket_match::{
    CricketMatch, Innings, InningsSchema, MatchRuleError, ScheduleMatchSchema, StartMatchSchema,
};
use crate::model::response::{ApiResponse, MatchDetails};
use crate::model::team::{RegistrationStatus, Team};
use crate::AppState;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use log::info;
use validator::Validate;

fn rule_error(err: MatchRuleError) -> ApiError {
    match err {
        MatchRuleError::OutOfOrder { .. } => ApiError::Conflict(err.to_string()),
        MatchRuleError::TossWinnerNotPlaying(_) => ApiError::BadRequest(err.to_string()),
        MatchRuleError::MissingInnings | MatchRuleError::UnknownStatus(_) => {
            ApiError::Internal(err.to_string())
        }
    }
}

async fn confirmed_team(data: &AppState, team_id: &str) -> Result<Team, ApiError> {
    let team = data
        .store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ApiError::team_not_found(team_id))?;
    if team.status() != RegistrationStatus::Confirmed {
        return Err(ApiError::Conflict(format!(
            "Team {} is {} and cannot be scheduled",
            team_id,
            team.status()
        )));
    }
    Ok(team)
}

async fn with_team_names(data: &AppState, game: CricketMatch) -> Result<MatchDetails, ApiError> {
    let team1_name = data.store.find_team(&game.team1_id).await?.map(|t| t.team_name);
    let team2_name = data.store.find_team(&game.team2_id).await?.map(|t| t.team_name);
    Ok(MatchDetails {
        game,
        team1_name,
        team2_name,
    })
}

/// Loads a match, applies one scoring step and saves it only if nobody else
/// moved the match on in the meantime.
async fn advance_match<F>(data: &AppState, match_id: &str, step: F) -> Result<CricketMatch, ApiError>
where
    F: FnOnce(&mut CricketMatch, DateTime<Utc>) -> Result<(), MatchRuleError>,
{
    let mut game = data
        .store
        .find_match(match_id)
        .await?
        .ok_or_else(|| ApiError::match_not_found(match_id))?;
    let expected = game.status().map_err(rule_error)?;
    step(&mut game, Utc::now()).map_err(rule_error)?;

    if !data.store.update_match(&game, expected).await? {
        return Err(ApiError::Conflict(format!(
            "Match {} was changed by another request",
            match_id
        )));
    }
    info!("Match {} moved from {} to {}", match_id, expected, game.status);
    Ok(game)
}

pub async fn schedule_match_service(
    data: Data<AppState>,
    body: Json<ScheduleMatchSchema>,
) -> Result<HttpResponse, ApiError> {
    let schedule = body.into_inner();
    schedule.validate()?;
    if schedule.team1_id == schedule.team2_id {
        return Err(ApiError::BadRequest(
            "A match needs two different teams".to_string(),
        ));
    }
    let team1 = confirmed_team(&data, &schedule.team1_id).await?;
    let team2 = confirmed_team(&data, &schedule.team2_id).await?;

    let game = CricketMatch::new(schedule, Utc::now());
    data.store.insert_match(&game).await?;
    info!(
        "Scheduled match {} ({} vs {}) at {}",
        game.match_number, team1.team_name, team2.team_name, game.scheduled_at
    );

    let details = MatchDetails {
        game,
        team1_name: Some(team1.team_name),
        team2_name: Some(team2.team_name),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Match scheduled", details)))
}

pub async fn start_match_service(
    data: Data<AppState>,
    match_id: String,
    body: Json<StartMatchSchema>,
) -> Result<HttpResponse, ApiError> {
    let toss = body.into_inner();
    let game = advance_match(&data, &match_id, |game, now| {
        game.start(&toss.toss_winner_id, toss.toss_decision, now)
    })
    .await?;
    let details = with_team_names(&data, game).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Match started", details)))
}

pub async fn first_innings_service(
    data: Data<AppState>,
    match_id: String,
    body: Json<InningsSchema>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let innings = Innings::from(&*body);
    let game = advance_match(&data, &match_id, |game, now| {
        game.record_first_innings(innings, now)
    })
    .await?;
    let details = with_team_names(&data, game).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("First innings recorded", details)))
}

pub async fn second_innings_service(
    data: Data<AppState>,
    match_id: String,
    body: Json<InningsSchema>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let innings = Innings::from(&*body);
    let game = advance_match(&data, &match_id, |game, now| {
        game.record_second_innings(innings, now)
    })
    .await?;
    let details = with_team_names(&data, game).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Second innings recorded", details)))
}

pub async fn finish_match_service(data: Data<AppState>, match_id: String) -> Result<HttpResponse, ApiError> {
    let game = advance_match(&data, &match_id, |game, now| game.finish(now).map(|_| ())).await?;
    let details = with_team_names(&data, game).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Match finished", details)))
}

pub async fn list_matches_service(data: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let names = data.store.team_names().await?;
    let games: Vec<MatchDetails> = data
        .store
        .list_matches()
        .await?
        .into_iter()
        .map(|game| MatchDetails {
            team1_name: names.get(&game.team1_id).cloned(),
            team2_name: names.get(&game.team2_id).cloned(),
            game,
        })
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Matches", games)))
}

pub async fn match_details_service(data: Data<AppState>, match_id: String) -> Result<HttpResponse, ApiError> {
    let game = data
        .store
        .find_match(&match_id)
        .await?
        .ok_or_else(|| ApiError::match_not_found(&match_id))?;
    let details = with_team_names(&data, game).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Match details", details)))
}
