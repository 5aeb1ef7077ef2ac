pub mod database;
pub mod memory;

use crate::model::cricket_match::{CricketMatch, MatchStatus};
use crate::model::player::{Player, PlayerDocument};
use crate::model::response::TeamSummary;
use crate::model::team::{RegistrationStatus, Team, TeamDocument, TeamLeader};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Unique constraints a registration insert can trip over.
pub const TEAM_ID_KEY: &str = "teams_pkey";
pub const TEAM_NAME_KEY: &str = "teams_active_name_key";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not get database connection from pool: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("error executing database query: {0}")]
    QueryError(#[from] diesel::result::Error),
    #[error("could not build database pool: {0}")]
    PoolBuildError(String),
    #[error("in-memory store lock was poisoned")]
    LockPoisoned,
    #[error("unique constraint {constraint:?} was violated")]
    Duplicate { constraint: Option<String> },
}

impl StoreError {
    pub fn is_duplicate_of(&self, key: &str) -> bool {
        matches!(self, StoreError::Duplicate { constraint: Some(c) } if c.as_str() == key)
    }
}

/// Everything written when a team registers; stored all-or-nothing.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub team: Team,
    pub leaders: Vec<TeamLeader>,
    pub players: Vec<Player>,
}

#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn team_id_taken(&self, team_id: &str) -> StoreResult<bool>;

    /// True when a team of that name (case-insensitive) exists and was not rejected.
    async fn team_name_taken(&self, team_name: &str) -> StoreResult<bool>;

    /// Fails with `StoreError::Duplicate` when the team id or an active team
    /// name is already taken.
    async fn insert_registration(&self, registration: NewRegistration) -> StoreResult<()>;

    async fn list_teams(&self, status: Option<RegistrationStatus>) -> StoreResult<Vec<TeamSummary>>;

    /// Team id to team name, for labelling matches.
    async fn team_names(&self) -> StoreResult<HashMap<String, String>>;

    async fn find_team(&self, team_id: &str) -> StoreResult<Option<Team>>;

    async fn find_team_leaders(&self, team_id: &str) -> StoreResult<Vec<TeamLeader>>;

    /// Players of one team ordered by jersey number.
    async fn find_roster(&self, team_id: &str) -> StoreResult<Vec<Player>>;

    async fn find_player(&self, player_id: &str) -> StoreResult<Option<Player>>;

    /// Moves a team from `from` to `to`. Returns `None` when the team is not
    /// currently in `from`.
    async fn transition_team(
        &self,
        team_id: &str,
        from: RegistrationStatus,
        to: RegistrationStatus,
        reason: Option<String>,
    ) -> StoreResult<Option<Team>>;

    async fn mark_team_document(&self, team_id: &str, document: TeamDocument) -> StoreResult<Option<Team>>;

    async fn mark_player_document(
        &self,
        player_id: &str,
        document: PlayerDocument,
    ) -> StoreResult<Option<Player>>;

    async fn insert_match(&self, game: &CricketMatch) -> StoreResult<()>;

    /// Matches ordered by schedule time, then match number.
    async fn list_matches(&self) -> StoreResult<Vec<CricketMatch>>;

    async fn find_match(&self, match_id: &str) -> StoreResult<Option<CricketMatch>>;

    /// Saves `game` only if the stored row still has status `expected`.
    async fn update_match(&self, game: &CricketMatch, expected: MatchStatus) -> StoreResult<bool>;
}
