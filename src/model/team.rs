use crate::model::player::PlayerSchema;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::model::schema::teams)]
pub struct Team {
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "teamName")]
    pub team_name: String,
    #[serde(rename = "churchName")]
    pub church_name: String,
    #[serde(rename = "pastorLetterUploaded")]
    pub pastor_letter_uploaded: bool,
    #[serde(rename = "paymentReceiptUploaded")]
    pub payment_receipt_uploaded: bool,
    #[serde(rename = "registrationStatus")]
    pub registration_status: String,
    #[serde(rename = "rejectionReason")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "registeredAt")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Unknown strings in storage read as pending, which discloses nothing.
    pub fn status(&self) -> RegistrationStatus {
        self.registration_status
            .parse()
            .unwrap_or(RegistrationStatus::Pending)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::model::schema::team_leaders)]
pub struct TeamLeader {
    #[serde(skip)]
    pub team_id: String,
    #[serde(skip)]
    pub role: String,
    pub name: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRefused {
    pub from: RegistrationStatus,
    pub to: RegistrationStatus,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Only a pending registration can be decided, and a decision is final.
    pub fn transition(self, to: RegistrationStatus) -> Result<RegistrationStatus, TransitionRefused> {
        match (self, to) {
            (RegistrationStatus::Pending, RegistrationStatus::Confirmed)
            | (RegistrationStatus::Pending, RegistrationStatus::Rejected) => Ok(to),
            _ => Err(TransitionRefused { from: self, to }),
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "confirmed" => Ok(RegistrationStatus::Confirmed),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(format!("unknown registration status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderRole {
    Captain,
    ViceCaptain,
}

impl LeaderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderRole::Captain => "captain",
            LeaderRole::ViceCaptain => "vice_captain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamDocument {
    PastorLetter,
    PaymentReceipt,
}

lazy_static! {
    pub(crate) static ref PHONE_NUMBER_MATCH_RE: Regex = Regex::new(r"^\+?\d{10,15}$").unwrap();
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct LeaderSchema {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(regex(
        path = "PHONE_NUMBER_MATCH_RE",
        message = "Phone must be 10 to 15 digits, optionally prefixed with +"
    ))]
    pub phone: String,
    #[validate(regex(
        path = "PHONE_NUMBER_MATCH_RE",
        message = "WhatsApp number must be 10 to 15 digits, optionally prefixed with +"
    ))]
    pub whatsapp: Option<String>,
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,
}

impl LeaderSchema {
    pub fn into_leader(self, team_id: &str, role: LeaderRole) -> TeamLeader {
        TeamLeader {
            team_id: team_id.to_string(),
            role: role.as_str().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone,
            whatsapp: self.whatsapp,
            email: self.email.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RegisterTeamSchema {
    #[serde(rename = "teamName")]
    #[validate(length(min = 2, max = 100, message = "Team name must be between 2 and 100 characters"))]
    pub team_name: String,
    #[serde(rename = "churchName")]
    #[validate(length(min = 2, max = 150, message = "Church name must be between 2 and 150 characters"))]
    pub church_name: String,
    #[validate]
    pub captain: LeaderSchema,
    #[serde(rename = "viceCaptain")]
    #[validate]
    pub vice_captain: LeaderSchema,
    #[validate]
    pub players: Vec<PlayerSchema>,
    #[serde(rename = "pastorLetterUploaded", default)]
    pub pastor_letter_uploaded: bool,
    #[serde(rename = "paymentReceiptUploaded", default)]
    pub payment_receipt_uploaded: bool,
}

#[derive(Debug, Deserialize, Default, Validate)]
#[serde(deny_unknown_fields)]
pub struct RejectTeamSchema {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

impl RejectTeamSchema {
    /// A blank body means no reason. Anything else must be a JSON object.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(RejectTeamSchema::default());
        }
        serde_json::from_slice(body)
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamDocumentSchema {
    pub document: TeamDocument,
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeamListQuery {
    pub status: Option<RegistrationStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_registration_can_be_confirmed_or_rejected() {
        assert_eq!(
            RegistrationStatus::Pending.transition(RegistrationStatus::Confirmed),
            Ok(RegistrationStatus::Confirmed)
        );
        assert_eq!(
            RegistrationStatus::Pending.transition(RegistrationStatus::Rejected),
            Ok(RegistrationStatus::Rejected)
        );
    }

    #[test]
    fn decided_registration_cannot_be_reversed() {
        for from in [RegistrationStatus::Confirmed, RegistrationStatus::Rejected] {
            for to in [
                RegistrationStatus::Pending,
                RegistrationStatus::Confirmed,
                RegistrationStatus::Rejected,
            ] {
                assert_eq!(from.transition(to), Err(TransitionRefused { from, to }));
            }
        }
    }

    #[test]
    fn status_string_form_round_trips_through_storage() {
        assert_eq!("confirmed".parse::<RegistrationStatus>(), Ok(RegistrationStatus::Confirmed));
        assert_eq!(RegistrationStatus::Rejected.to_string(), "rejected");
        assert!("approved".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn leader_schema_rejects_bad_contact_details() {
        let leader = LeaderSchema {
            name: "A".to_string(),
            phone: "12345".to_string(),
            whatsapp: Some("not-a-number".to_string()),
            email: "nobody".to_string(),
        };
        let errors = leader.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("whatsapp"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn rejection_body_is_optional_but_must_parse() {
        assert!(RejectTeamSchema::from_body(b"").unwrap().reason.is_none());
        assert!(RejectTeamSchema::from_body(b"  \n").unwrap().reason.is_none());
        assert_eq!(
            RejectTeamSchema::from_body(br#"{"reason":"Late fee"}"#)
                .unwrap()
                .reason
                .as_deref(),
            Some("Late fee")
        );
        assert!(RejectTeamSchema::from_body(br#"{"reason":12345}"#).is_err());
        assert!(RejectTeamSchema::from_body(b"not json at all").is_err());
        assert!(RejectTeamSchema::from_body(br#"{"reasons":"typo"}"#).is_err());
    }

    #[test]
    fn leader_email_is_normalised() {
        let leader = LeaderSchema {
            name: " Samuel Raj ".to_string(),
            phone: "+919876543210".to_string(),
            whatsapp: None,
            email: "Samuel@Example.ORG".to_string(),
        }
        .into_leader("TEAM-ABC123", LeaderRole::Captain);
        assert_eq!(leader.name, "Samuel Raj");
        assert_eq!(leader.email, "samuel@example.org");
        assert_eq!(leader.role, "captain");
    }
}
