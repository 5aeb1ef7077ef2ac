use crate::model::team::PHONE_NUMBER_MATCH_RE;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_SQUAD_SIZE: usize = 11;
pub const MAX_SQUAD_SIZE: usize = 15;

#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::model::schema::players)]
pub struct Player {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "jerseyNumber")]
    pub jersey_number: i32,
    pub name: String,
    pub age: i32,
    pub phone: Option<String>,
    pub role: String,
    #[serde(rename = "idProofUploaded")]
    pub id_proof_uploaded: bool,
    #[serde(rename = "consentFormUploaded")]
    pub consent_form_uploaded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    Batsman,
    Bowler,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Wicket-Keeper")]
    WicketKeeper,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-Rounder",
            PlayerRole::WicketKeeper => "Wicket-Keeper",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerDocument {
    IdProof,
    ConsentForm,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PlayerSchema {
    #[validate(length(min = 2, max = 100, message = "Player name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(range(min = 10, max = 80, message = "Player age must be between 10 and 80"))]
    pub age: i32,
    #[validate(regex(
        path = "PHONE_NUMBER_MATCH_RE",
        message = "Phone must be 10 to 15 digits, optionally prefixed with +"
    ))]
    pub phone: Option<String>,
    pub role: PlayerRole,
    #[serde(rename = "idProofUploaded", default)]
    pub id_proof_uploaded: bool,
    #[serde(rename = "consentFormUploaded", default)]
    pub consent_form_uploaded: bool,
}

impl PlayerSchema {
    /// Jersey numbers follow submission order, starting at 1.
    pub fn into_player(self, team_id: &str, jersey_number: i32) -> Player {
        Player {
            player_id: player_id_for(team_id, jersey_number),
            team_id: team_id.to_string(),
            jersey_number,
            name: self.name.trim().to_string(),
            age: self.age,
            phone: self.phone,
            role: self.role.as_str().to_string(),
            id_proof_uploaded: self.id_proof_uploaded,
            consent_form_uploaded: self.consent_form_uploaded,
        }
    }
}

pub fn player_id_for(team_id: &str, jersey_number: i32) -> String {
    format!("{team_id}-P{jersey_number:02}")
}

#[derive(Debug, Deserialize)]
pub struct PlayerDocumentSchema {
    pub document: PlayerDocument,
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(role: PlayerRole) -> PlayerSchema {
        PlayerSchema {
            name: "John Peter".to_string(),
            age: 24,
            phone: None,
            role,
            id_proof_uploaded: true,
            consent_form_uploaded: false,
        }
    }

    #[test]
    fn player_ids_are_derived_from_team_and_jersey() {
        assert_eq!(player_id_for("TEAM-X1Y2Z3", 7), "TEAM-X1Y2Z3-P07");
        assert_eq!(player_id_for("TEAM-X1Y2Z3", 12), "TEAM-X1Y2Z3-P12");
    }

    #[test]
    fn roles_use_their_display_names() {
        let player = schema(PlayerRole::WicketKeeper).into_player("TEAM-A", 1);
        assert_eq!(player.role, "Wicket-Keeper");
        assert!(player.id_proof_uploaded);
        assert!(!player.consent_form_uploaded);

        let parsed: PlayerRole = serde_json::from_str("\"All-Rounder\"").unwrap();
        assert_eq!(parsed, PlayerRole::AllRounder);
        assert!(serde_json::from_str::<PlayerRole>("\"Umpire\"").is_err());
    }

    #[test]
    fn out_of_range_age_fails_validation() {
        let mut player = schema(PlayerRole::Bowler);
        player.age = 5;
        assert!(player.validate().is_err());
        player.age = 30;
        assert!(player.validate().is_ok());
    }
}
