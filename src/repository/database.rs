use crate::config::config::Config;
use crate::model::cricket_match::{CricketMatch, MatchStatus};
use crate::model::player::{Player, PlayerDocument};
use crate::model::response::TeamSummary;
use crate::model::schema::{matches, players, team_leaders, teams};
use crate::model::team::{RegistrationStatus, Team, TeamDocument, TeamLeader};
use crate::repository::{NewRegistration, StoreError, StoreResult, TournamentStore};
use async_trait::async_trait;
use chrono::Utc;
use deadpool::managed::Object;
use diesel::dsl::count;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{
    ConnectionError, ConnectionResult, ExpressionMethods, OptionalExtension,
    PgTextExpressionMethods, QueryDsl,
};
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager},
    AsyncConnection, AsyncPgConnection, RunQueryDsl,
};
use log::{error, info};
use openssl::ssl::{SslConnector, SslMethod};
use postgres_openssl::MakeTlsConnector;
use scoped_futures::ScopedFutureExt;
use std::collections::HashMap;

pub type DBPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub struct Database {
    pool: DBPool,
}

impl Database {
    pub fn new(config: &Config, database_url: String) -> StoreResult<Self> {
        let manager = match config.database_ca_file.clone() {
            Some(ca_file) => {
                info!("Connecting to postgres over TLS using CA file {}", ca_file);
                AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_setup(
                    database_url,
                    move |url| Box::pin(Self::establish(url, ca_file.clone())),
                )
            }
            None => AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url),
        };
        let pool = Pool::builder(manager)
            .build()
            .map_err(|e| StoreError::PoolBuildError(e.to_string()))?;
        Ok(Database { pool })
    }

    async fn establish(database_url: &str, ca_file: String) -> ConnectionResult<AsyncPgConnection> {
        let mut builder = SslConnector::builder(SslMethod::tls())
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        builder
            .set_ca_file(&ca_file)
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        let connector = MakeTlsConnector::new(builder.build());
        let (client, connection) = tokio_postgres::connect(database_url, connector)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("postgres connection error: {e}");
            }
        });
        AsyncPgConnection::try_from(client).await
    }

    async fn get_db_conn(
        &self,
    ) -> StoreResult<Object<AsyncDieselConnectionManager<AsyncPgConnection>>> {
        self.pool.get().await.map_err(StoreError::PoolError)
    }
}

/// Escapes LIKE wildcards so a team name is matched literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl TournamentStore for Database {
    async fn team_id_taken(&self, team_id: &str) -> StoreResult<bool> {
        let mut conn = self.get_db_conn().await?;
        let found = teams::table
            .filter(teams::team_id.eq(team_id))
            .select(teams::team_id)
            .first::<String>(&mut conn)
            .await
            .optional()?;
        Ok(found.is_some())
    }

    async fn team_name_taken(&self, team_name: &str) -> StoreResult<bool> {
        let mut conn = self.get_db_conn().await?;
        let found = teams::table
            .filter(teams::team_name.ilike(escape_like(team_name.trim())))
            .filter(teams::registration_status.ne(RegistrationStatus::Rejected.as_str()))
            .select(teams::team_id)
            .first::<String>(&mut conn)
            .await
            .optional()?;
        Ok(found.is_some())
    }

    async fn insert_registration(&self, registration: NewRegistration) -> StoreResult<()> {
        let mut conn = self.get_db_conn().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(teams::table)
                    .values(&registration.team)
                    .execute(conn)
                    .await?;
                diesel::insert_into(team_leaders::table)
                    .values(&registration.leaders)
                    .execute(conn)
                    .await?;
                diesel::insert_into(players::table)
                    .values(&registration.players)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Duplicate {
                    constraint: info.constraint_name().map(str::to_string),
                }
            }
            err => {
                error!(
                    "An error occurred while inserting a team registration. The error: {:?}",
                    err
                );
                StoreError::QueryError(err)
            }
        })
    }

    async fn list_teams(&self, status: Option<RegistrationStatus>) -> StoreResult<Vec<TeamSummary>> {
        let mut conn = self.get_db_conn().await?;
        let mut query = teams::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(teams::registration_status.eq(status.as_str()));
        }
        let rows = query
            .order(teams::registered_at.asc())
            .load::<Team>(&mut conn)
            .await?;

        let counts: HashMap<String, i64> = players::table
            .group_by(players::team_id)
            .select((players::team_id, count(players::player_id)))
            .load::<(String, i64)>(&mut conn)
            .await?
            .into_iter()
            .collect();

        Ok(rows
            .iter()
            .map(|team| {
                let player_count = counts.get(&team.team_id).copied().unwrap_or(0);
                TeamSummary::from_team(team, player_count)
            })
            .collect())
    }

    async fn team_names(&self) -> StoreResult<HashMap<String, String>> {
        let mut conn = self.get_db_conn().await?;
        let names = teams::table
            .select((teams::team_id, teams::team_name))
            .load::<(String, String)>(&mut conn)
            .await?
            .into_iter()
            .collect();
        Ok(names)
    }

    async fn find_team(&self, team_id: &str) -> StoreResult<Option<Team>> {
        let mut conn = self.get_db_conn().await?;
        let team = teams::table
            .find(team_id)
            .first::<Team>(&mut conn)
            .await
            .optional()?;
        Ok(team)
    }

    async fn find_team_leaders(&self, team_id: &str) -> StoreResult<Vec<TeamLeader>> {
        let mut conn = self.get_db_conn().await?;
        let leaders = team_leaders::table
            .filter(team_leaders::team_id.eq(team_id))
            .load::<TeamLeader>(&mut conn)
            .await?;
        Ok(leaders)
    }

    async fn find_roster(&self, team_id: &str) -> StoreResult<Vec<Player>> {
        let mut conn = self.get_db_conn().await?;
        let roster = players::table
            .filter(players::team_id.eq(team_id))
            .order(players::jersey_number.asc())
            .load::<Player>(&mut conn)
            .await?;
        Ok(roster)
    }

    async fn find_player(&self, player_id: &str) -> StoreResult<Option<Player>> {
        let mut conn = self.get_db_conn().await?;
        let player = players::table
            .find(player_id)
            .first::<Player>(&mut conn)
            .await
            .optional()?;
        Ok(player)
    }

    async fn transition_team(
        &self,
        team_id: &str,
        from: RegistrationStatus,
        to: RegistrationStatus,
        reason: Option<String>,
    ) -> StoreResult<Option<Team>> {
        let mut conn = self.get_db_conn().await?;
        let team = diesel::update(
            teams::table
                .filter(teams::team_id.eq(team_id))
                .filter(teams::registration_status.eq(from.as_str())),
        )
        .set((
            teams::registration_status.eq(to.as_str()),
            teams::rejection_reason.eq(reason),
            teams::updated_at.eq(Utc::now()),
        ))
        .get_result::<Team>(&mut conn)
        .await
        .optional()?;
        Ok(team)
    }

    async fn mark_team_document(&self, team_id: &str, document: TeamDocument) -> StoreResult<Option<Team>> {
        let mut conn = self.get_db_conn().await?;
        let target = teams::table.filter(teams::team_id.eq(team_id));
        let now = Utc::now();
        let team = match document {
            TeamDocument::PastorLetter => {
                diesel::update(target)
                    .set((teams::pastor_letter_uploaded.eq(true), teams::updated_at.eq(now)))
                    .get_result::<Team>(&mut conn)
                    .await
            }
            TeamDocument::PaymentReceipt => {
                diesel::update(target)
                    .set((teams::payment_receipt_uploaded.eq(true), teams::updated_at.eq(now)))
                    .get_result::<Team>(&mut conn)
                    .await
            }
        }
        .optional()?;
        Ok(team)
    }

    async fn mark_player_document(
        &self,
        player_id: &str,
        document: PlayerDocument,
    ) -> StoreResult<Option<Player>> {
        let mut conn = self.get_db_conn().await?;
        let target = players::table.filter(players::player_id.eq(player_id));
        let player = match document {
            PlayerDocument::IdProof => {
                diesel::update(target)
                    .set(players::id_proof_uploaded.eq(true))
                    .get_result::<Player>(&mut conn)
                    .await
            }
            PlayerDocument::ConsentForm => {
                diesel::update(target)
                    .set(players::consent_form_uploaded.eq(true))
                    .get_result::<Player>(&mut conn)
                    .await
            }
        }
        .optional()?;
        Ok(player)
    }

    async fn insert_match(&self, game: &CricketMatch) -> StoreResult<()> {
        let mut conn = self.get_db_conn().await?;
        diesel::insert_into(matches::table)
            .values(game)
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn list_matches(&self) -> StoreResult<Vec<CricketMatch>> {
        let mut conn = self.get_db_conn().await?;
        let games = matches::table
            .order((matches::scheduled_at.asc(), matches::match_number.asc()))
            .load::<CricketMatch>(&mut conn)
            .await?;
        Ok(games)
    }

    async fn find_match(&self, match_id: &str) -> StoreResult<Option<CricketMatch>> {
        let mut conn = self.get_db_conn().await?;
        let game = matches::table
            .find(match_id)
            .first::<CricketMatch>(&mut conn)
            .await
            .optional()?;
        Ok(game)
    }

    async fn update_match(&self, game: &CricketMatch, expected: MatchStatus) -> StoreResult<bool> {
        let mut conn = self.get_db_conn().await?;
        let updated = diesel::update(
            matches::table
                .filter(matches::match_id.eq(&game.match_id))
                .filter(matches::status.eq(expected.as_str())),
        )
        .set(game)
        .execute(&mut conn)
        .await?;
        Ok(updated == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("St_Paul 100%"), "St\\_Paul 100\\%");
        assert_eq!(escape_like("Grace"), "Grace");
    }
}
