use crate::model::cricket_match::CricketMatch;
use crate::model::player::Player;
use crate::model::team::{Team, TeamLeader};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TeamSummary {
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "churchName")]
    pub church_name: String,
    #[serde(rename = "registrationStatus")]
    pub registration_status: String,
    #[serde(rename = "playerCount")]
    pub player_count: i64,
    #[serde(rename = "registeredAt")]
    pub registered_at: DateTime<Utc>,
}

impl TeamSummary {
    pub fn from_team(team: &Team, player_count: i64) -> Self {
        TeamSummary {
            team_id: team.team_id.to_owned(),
            team_name: team.team_name.to_owned(),
            church_name: team.church_name.to_owned(),
            registration_status: team.registration_status.to_owned(),
            player_count,
            registered_at: team.registered_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamDetails {
    #[serde(flatten)]
    pub team: Team,
    pub captain: Option<TeamLeader>,
    #[serde(rename = "viceCaptain")]
    pub vice_captain: Option<TeamLeader>,
    pub players: Vec<Player>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationReceipt {
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "registrationStatus")]
    pub registration_status: String,
    #[serde(rename = "playerIds")]
    pub player_ids: Vec<String>,
    #[serde(rename = "registeredAt")]
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PublicTeam {
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "registrationStatus")]
    pub registration_status: String,
    #[serde(rename = "teamName", skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(rename = "churchName", skip_serializing_if = "Option::is_none")]
    pub church_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PublicPlayer>>,
}

#[derive(Debug, Serialize)]
pub struct PublicPlayer {
    #[serde(rename = "jerseyNumber")]
    pub jersey_number: i32,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerDetails {
    #[serde(flatten)]
    pub player: Player,
    #[serde(rename = "teamName")]
    pub team_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentReceipt {
    pub document: String,
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    #[serde(rename = "storageFolderId")]
    pub storage_folder_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchDetails {
    #[serde(flatten)]
    pub game: CricketMatch,
    #[serde(rename = "team1Name")]
    pub team1_name: Option<String>,
    #[serde(rename = "team2Name")]
    pub team2_name: Option<String>,
}
