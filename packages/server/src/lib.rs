#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Salvador memorial.
//!
//! Serves the violent-death statistics computed from the SSP-BA export,
//! the Fogo Cruzado occurrence report (with a local fallback when the API
//! is unavailable), per-neighborhood stats with victim lights, and the
//! victim tribute store.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, error, middleware, web};
use memorial_fogo_cruzado::{FogoCruzadoClient, OccurrenceSource};
use memorial_server_models::ApiError;
use memorial_victims::VictimStore;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Start-up configuration.
    pub config: ServerConfig,
    /// Tribute database.
    pub victims: Arc<VictimStore>,
    /// Crime-data API, behind a trait so tests can substitute it.
    pub occurrences: Arc<dyn OccurrenceSource>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .route("/health", web::get().to(handlers::health))
            .route("/violence-data", web::get().to(handlers::violence_data))
            .route("/fogo-cruzado", web::get().to(handlers::fogo_cruzado))
            .route("/neighborhoods", web::get().to(handlers::neighborhoods))
            .route("/landmarks", web::get().to(handlers::landmarks))
            .route("/victims", web::get().to(handlers::list_victims))
            .route("/victims", web::post().to(handlers::create_victim))
            .route("/victims/{id}", web::get().to(handlers::get_victim))
            .route("/victims/{id}", web::patch().to(handlers::update_victim))
            .route("/victims/{id}", web::delete().to(handlers::delete_victim)),
    );
}

/// Malformed JSON bodies answer `400 { "error": ... }` like every other
/// API error.
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = format!("Corpo da requisição inválido: {err}");
    log::debug!("{message}");
    error::InternalError::from_response(err, HttpResponse::BadRequest().json(ApiError::new(message)))
        .into()
}

/// Starts the memorial API server.
///
/// Opens the tribute database (seeding it when empty), builds the Fogo
/// Cruzado client from the environment and starts the Actix-Web HTTP
/// server. The caller provides the async runtime and installs the logger.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the tribute database cannot be
/// opened, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!(
        "Opening victim database at {}...",
        config.victims_db_path.display()
    );
    let victims = VictimStore::open(&config.victims_db_path).map_err(std::io::Error::other)?;
    match victims.seed_if_empty() {
        Ok(0) => {}
        Ok(seeded) => log::info!("Seeded {seeded} tributes"),
        Err(e) => log::warn!("Failed to seed tributes: {e}"),
    }

    let bind_addr = config.bind_addr.clone();
    let port = config.port;

    let state = web::Data::new(AppState {
        config,
        victims: Arc::new(victims),
        occurrences: Arc::new(FogoCruzadoClient::from_env()),
    });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
