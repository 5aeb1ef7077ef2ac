use crate::model::cricket_match::{CricketMatch, MatchStatus};
use crate::model::player::{Player, PlayerDocument};
use crate::model::response::TeamSummary;
use crate::model::team::{RegistrationStatus, Team, TeamDocument, TeamLeader};
use crate::repository::{
    NewRegistration, StoreError, StoreResult, TournamentStore, TEAM_ID_KEY, TEAM_NAME_KEY,
};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    teams: HashMap<String, Team>,
    leaders: Vec<TeamLeader>,
    players: HashMap<String, Player>,
    matches: HashMap<String, CricketMatch>,
}

impl Tables {
    fn active_name_taken(&self, team_name: &str) -> bool {
        let wanted = team_name.trim().to_lowercase();
        self.teams.values().any(|team| {
            team.team_name.to_lowercase() == wanted && team.status() != RegistrationStatus::Rejected
        })
    }
}

/// In-process store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn team_id_taken(&self, team_id: &str) -> StoreResult<bool> {
        Ok(self.lock()?.teams.contains_key(team_id))
    }

    async fn team_name_taken(&self, team_name: &str) -> StoreResult<bool> {
        Ok(self.lock()?.active_name_taken(team_name))
    }

    async fn insert_registration(&self, registration: NewRegistration) -> StoreResult<()> {
        let mut tables = self.lock()?;
        let duplicate = if tables.teams.contains_key(&registration.team.team_id) {
            Some(TEAM_ID_KEY)
        } else if tables.active_name_taken(&registration.team.team_name) {
            Some(TEAM_NAME_KEY)
        } else {
            None
        };
        if let Some(key) = duplicate {
            return Err(StoreError::Duplicate {
                constraint: Some(key.to_string()),
            });
        }
        debug!(
            "Storing registration {} with {} players",
            registration.team.team_id,
            registration.players.len()
        );
        for player in registration.players {
            tables.players.insert(player.player_id.clone(), player);
        }
        tables.leaders.extend(registration.leaders);
        tables
            .teams
            .insert(registration.team.team_id.clone(), registration.team);
        Ok(())
    }

    async fn list_teams(&self, status: Option<RegistrationStatus>) -> StoreResult<Vec<TeamSummary>> {
        let tables = self.lock()?;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for player in tables.players.values() {
            *counts.entry(player.team_id.as_str()).or_insert(0) += 1;
        }

        let mut summaries: Vec<TeamSummary> = tables
            .teams
            .values()
            .filter(|team| status.map_or(true, |wanted| team.status() == wanted))
            .map(|team| {
                let player_count = counts.get(team.team_id.as_str()).copied().unwrap_or(0);
                TeamSummary::from_team(team, player_count)
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.team_id.cmp(&b.team_id))
        });
        Ok(summaries)
    }

    async fn team_names(&self) -> StoreResult<HashMap<String, String>> {
        let tables = self.lock()?;
        Ok(tables
            .teams
            .values()
            .map(|team| (team.team_id.clone(), team.team_name.clone()))
            .collect())
    }

    async fn find_team(&self, team_id: &str) -> StoreResult<Option<Team>> {
        Ok(self.lock()?.teams.get(team_id).cloned())
    }

    async fn find_team_leaders(&self, team_id: &str) -> StoreResult<Vec<TeamLeader>> {
        let tables = self.lock()?;
        Ok(tables
            .leaders
            .iter()
            .filter(|leader| leader.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn find_roster(&self, team_id: &str) -> StoreResult<Vec<Player>> {
        let tables = self.lock()?;
        let mut roster: Vec<Player> = tables
            .players
            .values()
            .filter(|player| player.team_id == team_id)
            .cloned()
            .collect();
        roster.sort_by_key(|player| player.jersey_number);
        Ok(roster)
    }

    async fn find_player(&self, player_id: &str) -> StoreResult<Option<Player>> {
        Ok(self.lock()?.players.get(player_id).cloned())
    }

    async fn transition_team(
        &self,
        team_id: &str,
        from: RegistrationStatus,
        to: RegistrationStatus,
        reason: Option<String>,
    ) -> StoreResult<Option<Team>> {
        let mut tables = self.lock()?;
        match tables.teams.get_mut(team_id) {
            Some(team) if team.status() == from => {
                team.registration_status = to.as_str().to_string();
                team.rejection_reason = reason;
                team.updated_at = Utc::now();
                Ok(Some(team.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_team_document(&self, team_id: &str, document: TeamDocument) -> StoreResult<Option<Team>> {
        let mut tables = self.lock()?;
        Ok(tables.teams.get_mut(team_id).map(|team| {
            match document {
                TeamDocument::PastorLetter => team.pastor_letter_uploaded = true,
                TeamDocument::PaymentReceipt => team.payment_receipt_uploaded = true,
            }
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn mark_player_document(
        &self,
        player_id: &str,
        document: PlayerDocument,
    ) -> StoreResult<Option<Player>> {
        let mut tables = self.lock()?;
        Ok(tables.players.get_mut(player_id).map(|player| {
            match document {
                PlayerDocument::IdProof => player.id_proof_uploaded = true,
                PlayerDocument::ConsentForm => player.consent_form_uploaded = true,
            }
            player.clone()
        }))
    }

    async fn insert_match(&self, game: &CricketMatch) -> StoreResult<()> {
        self.lock()?
            .matches
            .insert(game.match_id.clone(), game.clone());
        Ok(())
    }

    async fn list_matches(&self) -> StoreResult<Vec<CricketMatch>> {
        let mut games: Vec<CricketMatch> = self.lock()?.matches.values().cloned().collect();
        games.sort_by(|a, b| {
            a.scheduled_at
                .cmp(&b.scheduled_at)
                .then_with(|| a.match_number.cmp(&b.match_number))
        });
        Ok(games)
    }

    async fn find_match(&self, match_id: &str) -> StoreResult<Option<CricketMatch>> {
        Ok(self.lock()?.matches.get(match_id).cloned())
    }

    async fn update_match(&self, game: &CricketMatch, expected: MatchStatus) -> StoreResult<bool> {
        let mut tables = self.lock()?;
        match tables.matches.get_mut(&game.match_id) {
            Some(stored) if stored.status == expected.as_str() => {
                *stored = game.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
