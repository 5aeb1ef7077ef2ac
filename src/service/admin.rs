use crate::error::ApiError;
use crate::model::response::{ApiResponse, PlayerDetails, TeamDetails};
use crate::model::team::{LeaderRole, RegistrationStatus, RejectTeamSchema, Team, TeamListQuery};
use crate::util::send_email::RegistrationNotice;
use crate::AppState;
use actix_web::web::{Bytes, Data, Query};
use actix_web::HttpResponse;
use log::{info, warn};
use validator::Validate;

pub async fn list_teams_service(
    data: Data<AppState>,
    query: Query<TeamListQuery>,
) -> Result<HttpResponse, ApiError> {
    let teams = data.store.list_teams(query.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        format!("{} team registrations", teams.len()),
        teams,
    )))
}

pub async fn team_details_service(data: Data<AppState>, team_id: String) -> Result<HttpResponse, ApiError> {
    let team = data
        .store
        .find_team(&team_id)
        .await?
        .ok_or_else(|| ApiError::team_not_found(&team_id))?;
    let leaders = data.store.find_team_leaders(&team_id).await?;
    let players = data.store.find_roster(&team_id).await?;

    let leader = |role: LeaderRole| leaders.iter().find(|l| l.role == role.as_str()).cloned();
    let details = TeamDetails {
        captain: leader(LeaderRole::Captain),
        vice_captain: leader(LeaderRole::ViceCaptain),
        team,
        players,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Team details", details)))
}

pub async fn player_details_service(
    data: Data<AppState>,
    player_id: String,
) -> Result<HttpResponse, ApiError> {
    let player = data
        .store
        .find_player(&player_id)
        .await?
        .ok_or_else(|| ApiError::player_not_found(&player_id))?;
    let team_name = data
        .store
        .find_team(&player.team_id)
        .await?
        .map(|team| team.team_name);
    if team_name.is_none() {
        warn!(
            "Player {} belongs to team {} which does not exist",
            player.player_id, player.team_id
        );
    }
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Player details",
        PlayerDetails { player, team_name },
    )))
}

pub async fn confirm_team_service(data: Data<AppState>, team_id: String) -> Result<HttpResponse, ApiError> {
    let team = decide_registration(&data, &team_id, RegistrationStatus::Confirmed, None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Registration confirmed", team)))
}

pub async fn reject_team_service(
    data: Data<AppState>,
    team_id: String,
    body: Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = RejectTeamSchema::from_body(&body)
        .map_err(|err| ApiError::BadRequest(format!("Rejection body is not valid JSON: {err}")))?;
    request.validate()?;
    let reason = request
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    let team = decide_registration(&data, &team_id, RegistrationStatus::Rejected, reason).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Registration rejected", team)))
}

async fn decide_registration(
    data: &AppState,
    team_id: &str,
    to: RegistrationStatus,
    reason: Option<String>,
) -> Result<Team, ApiError> {
    let team = data
        .store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ApiError::team_not_found(team_id))?;
    let from = team.status();
    from.transition(to).map_err(|refused| {
        ApiError::Conflict(format!(
            "Registration {} is already {} and cannot be {}",
            team_id, refused.from, refused.to
        ))
    })?;

    let updated = data
        .store
        .transition_team(team_id, from, to, reason)
        .await?
        .ok_or_else(|| {
            ApiError::Conflict(format!(
                "Registration {} was changed by another request",
                team_id
            ))
        })?;
    info!("Registration {} moved from {} to {}", team_id, from, to);

    send_decision_notice(data, &updated).await;
    Ok(updated)
}

/// Email failures are logged and never undo the decision.
async fn send_decision_notice(data: &AppState, team: &Team) {
    let leaders = match data.store.find_team_leaders(&team.team_id).await {
        Ok(leaders) => leaders,
        Err(err) => {
            warn!(
                "Could not load leaders of team {} for notification. The error: {:?}",
                team.team_id, err
            );
            return;
        }
    };

    let mut recipients: Vec<String> = Vec::new();
    for leader in &leaders {
        if !recipients.contains(&leader.email) {
            recipients.push(leader.email.clone());
        }
    }
    let captain_name = leaders
        .iter()
        .find(|l| l.role == LeaderRole::Captain.as_str())
        .map(|l| l.name.clone())
        .unwrap_or_default();

    let notice = RegistrationNotice {
        team_id: team.team_id.clone(),
        team_name: team.team_name.clone(),
        church_name: team.church_name.clone(),
        captain_name,
        recipients,
        reason: team.rejection_reason.clone(),
    };

    let sent = match team.status() {
        RegistrationStatus::Confirmed => data.notifier.registration_confirmed(&notice).await,
        RegistrationStatus::Rejected => data.notifier.registration_rejected(&notice).await,
        RegistrationStatus::Pending => return,
    };
    if let Err(err) = sent {
        warn!(
            "Notification for team {} could not be sent. The error: {}",
            team.team_id, err
        );
    }
}
