//! # Inkwell API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_files::Files;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::handlers;
use api_server::middleware::cors::cors;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use inkwell_infra::storage::UPLOADS_PREFIX;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Inkwell API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let upload_dir = config.upload_dir.clone();
    let cors_origins = config.cors_origins.clone();
    if cors_origins.is_empty() {
        tracing::info!("CORS_ORIGIN not set; cross-origin requests are refused");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS enabled");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&cors_origins))
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .service(Files::new(UPLOADS_PREFIX, &upload_dir))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
