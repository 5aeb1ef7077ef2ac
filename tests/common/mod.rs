use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use cricket_league::config::config::Config;
use cricket_league::model::cricket_match::{CricketMatch, MatchStatus};
use cricket_league::model::player::{Player, PlayerDocument};
use cricket_league::model::response::TeamSummary;
use cricket_league::model::team::{RegistrationStatus, Team, TeamDocument, TeamLeader};
use cricket_league::repository::memory::MemoryStore;
use cricket_league::repository::{NewRegistration, StoreResult, TournamentStore};
use cricket_league::util::send_email::{Notifier, NotifyError, RegistrationNotice};
use cricket_league::{app_config, not_found, AppState};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Keeps every notice instead of mailing it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<(String, RegistrationNotice)>>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn kinds(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(kind, _)| kind.clone())
            .collect()
    }

    pub fn last(&self) -> Option<RegistrationNotice> {
        self.sent.lock().unwrap().last().map(|(_, notice)| notice.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn registration_confirmed(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push(("confirmed".to_string(), notice.clone()));
        Ok(())
    }

    async fn registration_rejected(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push(("rejected".to_string(), notice.clone()));
        Ok(())
    }
}

/// Every send fails, as when the mail service is down.
#[allow(dead_code)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn registration_confirmed(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        Err(NotifyError::SendError(format!("mail service unavailable for {}", notice.team_id)))
    }

    async fn registration_rejected(&self, notice: &RegistrationNotice) -> Result<(), NotifyError> {
        Err(NotifyError::SendError(format!("mail service unavailable for {}", notice.team_id)))
    }
}

/// Wraps `MemoryStore` to replay what another request would see mid-flight:
/// frozen team reads, a name check that misses a concurrent insert, and
/// teams whose row has gone missing.
#[allow(dead_code)]
#[derive(Default)]
pub struct LaggingStore {
    pub inner: MemoryStore,
    pub blind_name_check: bool,
    frozen: Mutex<HashMap<String, Team>>,
    hidden: Mutex<HashSet<String>>,
}

#[allow(dead_code)]
impl LaggingStore {
    pub fn blind() -> Self {
        LaggingStore {
            blind_name_check: true,
            ..Default::default()
        }
    }

    /// Later `find_team` calls return the team as it is now.
    pub async fn freeze(&self, team_id: &str) {
        let team = self.inner.find_team(team_id).await.unwrap().unwrap();
        self.frozen.lock().unwrap().insert(team_id.to_string(), team);
    }

    pub fn hide(&self, team_id: &str) {
        self.hidden.lock().unwrap().insert(team_id.to_string());
    }
}

#[async_trait]
impl TournamentStore for LaggingStore {
    async fn team_id_taken(&self, team_id: &str) -> StoreResult<bool> {
        self.inner.team_id_taken(team_id).await
    }

    async fn team_name_taken(&self, team_name: &str) -> StoreResult<bool> {
        if self.blind_name_check {
            return Ok(false);
        }
        self.inner.team_name_taken(team_name).await
    }

    async fn insert_registration(&self, registration: NewRegistration) -> StoreResult<()> {
        self.inner.insert_registration(registration).await
    }

    async fn list_teams(&self, status: Option<RegistrationStatus>) -> StoreResult<Vec<TeamSummary>> {
        self.inner.list_teams(status).await
    }

    async fn team_names(&self) -> StoreResult<HashMap<String, String>> {
        self.inner.team_names().await
    }

    async fn find_team(&self, team_id: &str) -> StoreResult<Option<Team>> {
        if self.hidden.lock().unwrap().contains(team_id) {
            return Ok(None);
        }
        let frozen = self.frozen.lock().unwrap().get(team_id).cloned();
        match frozen {
            Some(team) => Ok(Some(team)),
            None => self.inner.find_team(team_id).await,
        }
    }

    async fn find_team_leaders(&self, team_id: &str) -> StoreResult<Vec<TeamLeader>> {
        self.inner.find_team_leaders(team_id).await
    }

    async fn find_roster(&self, team_id: &str) -> StoreResult<Vec<Player>> {
        self.inner.find_roster(team_id).await
    }

    async fn find_player(&self, player_id: &str) -> StoreResult<Option<Player>> {
        self.inner.find_player(player_id).await
    }

    async fn transition_team(
        &self,
        team_id: &str,
        from: RegistrationStatus,
        to: RegistrationStatus,
        reason: Option<String>,
    ) -> StoreResult<Option<Team>> {
        self.inner.transition_team(team_id, from, to, reason).await
    }

    async fn mark_team_document(&self, team_id: &str, document: TeamDocument) -> StoreResult<Option<Team>> {
        self.inner.mark_team_document(team_id, document).await
    }

    async fn mark_player_document(
        &self,
        player_id: &str,
        document: PlayerDocument,
    ) -> StoreResult<Option<Player>> {
        self.inner.mark_player_document(player_id, document).await
    }

    async fn insert_match(&self, game: &CricketMatch) -> StoreResult<()> {
        self.inner.insert_match(game).await
    }

    async fn list_matches(&self) -> StoreResult<Vec<CricketMatch>> {
        self.inner.list_matches().await
    }

    async fn find_match(&self, match_id: &str) -> StoreResult<Option<CricketMatch>> {
        self.inner.find_match(match_id).await
    }

    async fn update_match(&self, game: &CricketMatch, expected: MatchStatus) -> StoreResult<bool> {
        self.inner.update_match(game, expected).await
    }
}

#[allow(dead_code)]
pub fn state_with(store: Arc<dyn TournamentStore>, notifier: Arc<dyn Notifier>) -> web::Data<AppState> {
    web::Data::new(AppState {
        store,
        notifier,
        config: Config::default(),
    })
}

pub fn test_state() -> (web::Data<AppState>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let state = state_with(Arc::new(MemoryStore::new()), Arc::new(notifier.clone()));
    (state, notifier)
}

/// Runs one request against a fresh app sharing `state` and returns the
/// status with the decoded body.
pub async fn send(state: &web::Data<AppState>, req: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(app_config)
            .default_service(web::route().to(not_found)),
    )
    .await;
    let response = test::call_service(&app, req.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn registration_body(team_name: &str, squad_size: usize) -> Value {
    let players: Vec<Value> = (1..=squad_size)
        .map(|n| {
            json!({
                "name": format!("Player Number {n}"),
                "age": 18 + n,
                "phone": format!("98765432{:02}", n),
                "role": if n == 1 { "Wicket-Keeper" } else { "All-Rounder" },
            })
        })
        .collect();
    json!({
        "teamName": team_name,
        "churchName": "St. Thomas Church",
        "captain": {
            "name": "Samuel Raj",
            "phone": "+919876543210",
            "whatsapp": "+919876543210",
            "email": "Captain@Example.org"
        },
        "viceCaptain": {
            "name": "David Paul",
            "phone": "9876543211",
            "email": "vice@example.org"
        },
        "players": players,
        "pastorLetterUploaded": true
    })
}

#[allow(dead_code)]
pub async fn register_team(state: &web::Data<AppState>, team_name: &str) -> String {
    let (status, body) = send(
        state,
        test::TestRequest::post()
            .uri("/api/teams/register")
            .set_json(registration_body(team_name, 11)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body["data"]["teamId"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn confirmed_team(state: &web::Data<AppState>, team_name: &str) -> String {
    let team_id = register_team(state, team_name).await;
    let (status, body) = send(
        state,
        test::TestRequest::put().uri(&format!("/admin/teams/{team_id}/confirm")),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "confirmation failed: {body}");
    team_id
}
