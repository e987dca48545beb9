use actix_web::{App, HttpServer, web};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::io::Error::other(e)
    })?;

    let gap_analysis_service = web::Data::new(state.gap_analysis_service);

    tracing::info!(
        partial_match = config.thresholds.partial_match,
        full_match = config.thresholds.full_match,
        covered = config.thresholds.covered,
        "Starting Trustify DA Coverage Gaps server on {}",
        bind_addr
    );

    HttpServer::new(move || {
        App::new()
            .app_data(gap_analysis_service.clone())
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .configure(api::coverage::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
