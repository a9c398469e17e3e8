//! # Scribe API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing_actix_web::TracingLogger;

mod bootstrap;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::{RequestIdMiddleware, TimingMiddleware};
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Scribe API Server on {}:{}{}",
        config.host,
        config.port,
        config.api_prefix
    );

    let state = AppState::new(&config).await;
    bootstrap::seed_first_superuser(&state, &config).await;

    let data = web::Data::new(state);
    let prefix = config.api_prefix.clone();
    let origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&origins))
            .wrap(TimingMiddleware)
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(data.clone())
            .service(web::scope(&prefix).configure(handlers::configure_routes))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

/// `*` opens the API to any origin; an empty list allows none.
fn cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
