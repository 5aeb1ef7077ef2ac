use crate::config::config::Config;
use crate::error::ApiError;
use crate::model::response::ApiResponse;
use crate::repository::TournamentStore;
use crate::util::send_email::Notifier;
use actix_web::{get, web, HttpResponse, Responder};
use std::sync::Arc;

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod util;

pub struct AppState {
    pub store: Arc<dyn TournamentStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}

#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok("Everything is working as expected", ()))
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::route_not_found())
}

/// Routes plus extractor settings that turn malformed bodies and queries
/// into the standard error envelope.
pub fn app_config(conf: &mut web::ServiceConfig) {
    conf.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(health_check)
    .configure(controller::handler::config);
}
