use crate::error::ApiError;
use crate::model::player::{
    Player, PlayerDocument, PlayerDocumentSchema, MAX_SQUAD_SIZE, MIN_SQUAD_SIZE,
};
use crate::model::response::{ApiResponse, DocumentReceipt, PublicPlayer, PublicTeam, RegistrationReceipt};
use crate::model::team::{
    LeaderRole, RegisterTeamSchema, RegistrationStatus, Team, TeamDocument, TeamDocumentSchema,
};
use crate::repository::{NewRegistration, TEAM_ID_KEY, TEAM_NAME_KEY};
use crate::util::random_string_gen::generate_team_id;
use crate::AppState;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashSet;
use validator::Validate;

const MAX_TEAM_ID_ATTEMPTS: usize = 5;

fn check_squad(registration: &RegisterTeamSchema) -> Result<(), ApiError> {
    let size = registration.players.len();
    if !(MIN_SQUAD_SIZE..=MAX_SQUAD_SIZE).contains(&size) {
        return Err(ApiError::BadRequest(format!(
            "A squad must have between {} and {} players, got {}",
            MIN_SQUAD_SIZE, MAX_SQUAD_SIZE, size
        )));
    }

    let mut seen = HashSet::new();
    for player in &registration.players {
        let name = player.name.trim().to_lowercase();
        if !seen.insert(name) {
            return Err(ApiError::BadRequest(format!(
                "Player {} is listed more than once",
                player.name.trim()
            )));
        }
    }
    Ok(())
}

async fn allocate_team_id(data: &AppState) -> Result<String, ApiError> {
    for _ in 0..MAX_TEAM_ID_ATTEMPTS {
        let candidate = generate_team_id(&data.config.team_id_prefix);
        if !data.store.team_id_taken(&candidate).await? {
            return Ok(candidate);
        }
        warn!("Generated team id {} already exists, retrying", candidate);
    }
    Err(ApiError::Internal(
        "could not allocate a unique team id".to_string(),
    ))
}

fn name_conflict(team_name: &str) -> ApiError {
    ApiError::Conflict(format!("A team named {} is already registered", team_name))
}

fn build_registration(
    registration: &RegisterTeamSchema,
    team_id: &str,
    now: DateTime<Utc>,
) -> NewRegistration {
    let registration = registration.clone();
    let team = Team {
        team_id: team_id.to_string(),
        team_name: registration.team_name.trim().to_string(),
        church_name: registration.church_name.trim().to_string(),
        pastor_letter_uploaded: registration.pastor_letter_uploaded,
        payment_receipt_uploaded: registration.payment_receipt_uploaded,
        registration_status: RegistrationStatus::Pending.as_str().to_string(),
        rejection_reason: None,
        registered_at: now,
        updated_at: now,
    };
    let leaders = vec![
        registration.captain.into_leader(team_id, LeaderRole::Captain),
        registration
            .vice_captain
            .into_leader(team_id, LeaderRole::ViceCaptain),
    ];
    let players: Vec<Player> = registration
        .players
        .into_iter()
        .enumerate()
        .map(|(index, player)| player.into_player(team_id, index as i32 + 1))
        .collect();
    NewRegistration {
        team,
        leaders,
        players,
    }
}

pub async fn register_team_service(
    data: Data<AppState>,
    body: Json<RegisterTeamSchema>,
) -> Result<HttpResponse, ApiError> {
    let registration = body.into_inner();
    registration.validate()?;
    check_squad(&registration)?;

    let team_name = registration.team_name.trim().to_string();
    if data.store.team_name_taken(&team_name).await? {
        return Err(name_conflict(&team_name));
    }

    // Unique keys in storage settle races between concurrent registrations.
    for _ in 0..MAX_TEAM_ID_ATTEMPTS {
        let team_id = allocate_team_id(&data).await?;
        let now = Utc::now();
        let new_registration = build_registration(&registration, &team_id, now);
        let receipt = RegistrationReceipt {
            team_id: team_id.clone(),
            team_name: new_registration.team.team_name.clone(),
            registration_status: new_registration.team.registration_status.clone(),
            player_ids: new_registration
                .players
                .iter()
                .map(|p| p.player_id.clone())
                .collect(),
            registered_at: now,
        };

        match data.store.insert_registration(new_registration).await {
            Ok(()) => {
                info!(
                    "Registered team {} ({}) with {} players",
                    receipt.team_id,
                    receipt.team_name,
                    receipt.player_ids.len()
                );
                return Ok(HttpResponse::Ok().json(ApiResponse::ok(
                    "Registration submitted and awaiting confirmation",
                    receipt,
                )));
            }
            Err(err) if err.is_duplicate_of(TEAM_ID_KEY) => {
                warn!("Team id {} was taken during insert, retrying", team_id);
            }
            Err(err) if err.is_duplicate_of(TEAM_NAME_KEY) => {
                return Err(name_conflict(&team_name));
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(ApiError::Internal(
        "could not allocate a unique team id".to_string(),
    ))
}

pub async fn list_public_teams_service(data: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let teams: Vec<PublicTeam> = data
        .store
        .list_teams(Some(RegistrationStatus::Confirmed))
        .await?
        .into_iter()
        .map(|summary| PublicTeam {
            team_id: summary.team_id,
            registration_status: summary.registration_status,
            team_name: Some(summary.team_name),
            church_name: Some(summary.church_name),
            players: None,
        })
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Confirmed teams", teams)))
}

pub async fn public_team_service(data: Data<AppState>, team_id: String) -> Result<HttpResponse, ApiError> {
    let team = data
        .store
        .find_team(&team_id)
        .await?
        .ok_or_else(|| ApiError::team_not_found(&team_id))?;

    let public = if team.status() == RegistrationStatus::Confirmed {
        let players = data
            .store
            .find_roster(&team_id)
            .await?
            .into_iter()
            .map(|p| PublicPlayer {
                jersey_number: p.jersey_number,
                name: p.name,
                role: p.role,
            })
            .collect();
        PublicTeam {
            team_id: team.team_id,
            registration_status: team.registration_status,
            team_name: Some(team.team_name),
            church_name: Some(team.church_name),
            players: Some(players),
        }
    } else {
        PublicTeam {
            team_id: team.team_id,
            registration_status: team.registration_status,
            team_name: None,
            church_name: None,
            players: None,
        }
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Team registration status", public)))
}

pub async fn team_document_service(
    data: Data<AppState>,
    team_id: String,
    body: Json<TeamDocumentSchema>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    data.store
        .mark_team_document(&team_id, request.document)
        .await?
        .ok_or_else(|| ApiError::team_not_found(&team_id))?;

    let (name, folder) = match request.document {
        TeamDocument::PastorLetter => ("pastor_letter", &data.config.folders.pastor_letter),
        TeamDocument::PaymentReceipt => ("payment_receipt", &data.config.folders.payment_receipt),
    };
    info!(
        "Team {} uploaded {} (file {:?})",
        team_id, name, request.file_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Document recorded",
        DocumentReceipt {
            document: name.to_string(),
            file_id: request.file_id,
            storage_folder_id: folder.clone(),
        },
    )))
}

pub async fn player_document_service(
    data: Data<AppState>,
    player_id: String,
    body: Json<PlayerDocumentSchema>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    data.store
        .mark_player_document(&player_id, request.document)
        .await?
        .ok_or_else(|| ApiError::player_not_found(&player_id))?;

    let (name, folder) = match request.document {
        PlayerDocument::IdProof => ("id_proof", &data.config.folders.player_id_proof),
        PlayerDocument::ConsentForm => ("consent_form", &data.config.folders.player_consent),
    };
    info!(
        "Player {} uploaded {} (file {:?})",
        player_id, name, request.file_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Document recorded",
        DocumentReceipt {
            document: name.to_string(),
            file_id: request.file_id,
            storage_folder_id: folder.clone(),
        },
    )))
}
