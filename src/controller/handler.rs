use crate::model::cricket_match::{InningsSchema, ScheduleMatchSchema, StartMatchSchema};
use crate::model::player::PlayerDocumentSchema;
use crate::model::team::{RegisterTeamSchema, TeamDocumentSchema, TeamListQuery};
use crate::service::admin::{
    confirm_team_service, list_teams_service, player_details_service, reject_team_service,
    team_details_service,
};
use crate::service::matches::{
    finish_match_service, first_innings_service, list_matches_service, match_details_service,
    schedule_match_service, second_innings_service, start_match_service,
};
use crate::service::registration::{
    list_public_teams_service, player_document_service, public_team_service,
    register_team_service, team_document_service,
};
use crate::AppState;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, put, web, Responder};

#[post("/teams/register")]
async fn register_team_handler(
    data: Data<AppState>,
    new_team: Json<RegisterTeamSchema>,
) -> impl Responder {
    register_team_service(data, new_team).await
}

#[get("/teams")]
async fn list_public_teams_handler(data: Data<AppState>) -> impl Responder {
    list_public_teams_service(data).await
}

#[get("/teams/{team_id}")]
async fn public_team_handler(data: Data<AppState>, team_id: Path<String>) -> impl Responder {
    public_team_service(data, team_id.into_inner()).await
}

#[put("/teams/{team_id}/documents")]
async fn team_document_handler(
    data: Data<AppState>,
    team_id: Path<String>,
    document: Json<TeamDocumentSchema>,
) -> impl Responder {
    team_document_service(data, team_id.into_inner(), document).await
}

#[put("/players/{player_id}/documents")]
async fn player_document_handler(
    data: Data<AppState>,
    player_id: Path<String>,
    document: Json<PlayerDocumentSchema>,
) -> impl Responder {
    player_document_service(data, player_id.into_inner(), document).await
}

#[get("/matches")]
async fn list_matches_handler(data: Data<AppState>) -> impl Responder {
    list_matches_service(data).await
}

#[get("/matches/{match_id}")]
async fn match_details_handler(data: Data<AppState>, match_id: Path<String>) -> impl Responder {
    match_details_service(data, match_id.into_inner()).await
}

#[get("/teams")]
async fn admin_list_teams_handler(
    data: Data<AppState>,
    query: Query<TeamListQuery>,
) -> impl Responder {
    list_teams_service(data, query).await
}

#[get("/teams/{team_id}")]
async fn admin_team_details_handler(data: Data<AppState>, team_id: Path<String>) -> impl Responder {
    team_details_service(data, team_id.into_inner()).await
}

#[get("/players/{player_id}")]
async fn admin_player_details_handler(
    data: Data<AppState>,
    player_id: Path<String>,
) -> impl Responder {
    player_details_service(data, player_id.into_inner()).await
}

#[put("/teams/{team_id}/confirm")]
async fn confirm_team_handler(data: Data<AppState>, team_id: Path<String>) -> impl Responder {
    confirm_team_service(data, team_id.into_inner()).await
}

#[put("/teams/{team_id}/reject")]
async fn reject_team_handler(
    data: Data<AppState>,
    team_id: Path<String>,
    body: web::Bytes,
) -> impl Responder {
    reject_team_service(data, team_id.into_inner(), body).await
}

#[post("/matches")]
async fn schedule_match_handler(
    data: Data<AppState>,
    schedule: Json<ScheduleMatchSchema>,
) -> impl Responder {
    schedule_match_service(data, schedule).await
}

#[put("/matches/{match_id}/start")]
async fn start_match_handler(
    data: Data<AppState>,
    match_id: Path<String>,
    toss: Json<StartMatchSchema>,
) -> impl Responder {
    start_match_service(data, match_id.into_inner(), toss).await
}

#[put("/matches/{match_id}/first-innings")]
async fn first_innings_handler(
    data: Data<AppState>,
    match_id: Path<String>,
    innings: Json<InningsSchema>,
) -> impl Responder {
    first_innings_service(data, match_id.into_inner(), innings).await
}

#[put("/matches/{match_id}/second-innings")]
async fn second_innings_handler(
    data: Data<AppState>,
    match_id: Path<String>,
    innings: Json<InningsSchema>,
) -> impl Responder {
    second_innings_service(data, match_id.into_inner(), innings).await
}

#[put("/matches/{match_id}/finish")]
async fn finish_match_handler(data: Data<AppState>, match_id: Path<String>) -> impl Responder {
    finish_match_service(data, match_id.into_inner()).await
}

pub fn config(conf: &mut web::ServiceConfig) {
    let public = web::scope("/api")
        .service(register_team_handler)
        .service(list_public_teams_handler)
        .service(public_team_handler)
        .service(team_document_handler)
        .service(player_document_handler)
        .service(list_matches_handler)
        .service(match_details_handler);

    let admin = web::scope("/admin")
        .service(admin_list_teams_handler)
        .service(admin_team_details_handler)
        .service(admin_player_details_handler)
        .service(confirm_team_handler)
        .service(reject_team_handler)
        .service(schedule_match_handler)
        .service(start_match_handler)
        .service(first_innings_handler)
        .service(second_innings_handler)
        .service(finish_match_handler);

    conf.service(public).service(admin);
}
