use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use cricket_league::config::config::Config;
use cricket_league::repository::database::Database;
use cricket_league::repository::memory::MemoryStore;
use cricket_league::repository::TournamentStore;
use cricket_league::util::real_ip_key_extractor::RealIpKeyExtractor;
use cricket_league::util::send_email::{LogNotifier, Notifier, SesNotifier};
use cricket_league::{app_config, not_found, AppState};
use log::{info, warn};
use std::io::{Error, ErrorKind};
use std::sync::Arc;

fn io_error(err: impl std::fmt::Display) -> Error {
    Error::new(ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = Config::init().map_err(io_error)?;
    log4rs::init_file(&config.log_config_file, Default::default()).map_err(io_error)?;

    let store: Arc<dyn TournamentStore> = match config.database_url.clone() {
        Some(url) => Arc::new(Database::new(&config, url).map_err(io_error)?),
        None => {
            warn!("DATABASE_URL is not set, registrations are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = if config.email.enabled {
        Arc::new(SesNotifier::new(&config.email).map_err(io_error)?)
    } else {
        info!("Email is disabled, decisions are only logged");
        Arc::new(LogNotifier)
    };

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_per_second)
        .burst_size(config.rate_limit_burst)
        .key_extractor(RealIpKeyExtractor)
        .finish()
        .ok_or_else(|| io_error("rate limit values must be greater than zero"))?;

    let bind_address = config.bind_address();
    let app_data = web::Data::new(AppState {
        store,
        notifier,
        config,
    });

    info!("Starting server on {}:{}", bind_address.0, bind_address.1);
    HttpServer::new(move || {
        App::new()
            .app_data(app_data.clone())
            .configure(app_config)
            .default_service(web::route().to(not_found))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(Governor::new(&governor_conf))
    })
    .bind(bind_address)?
    .run()
    .await
}
