use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use showroom_client::{CloudinaryUploader, HostingConfig, HttpMailer, MailerConfig};
use showroom_db::{Database, DatabaseConfig};
use showroom_server::config::ServerConfig;
use showroom_server::routes;
use showroom_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("showroom=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    if config.admin_token.is_none() {
        tracing::warn!("SHOWROOM_ADMIN_TOKEN not set; listing creation is disabled");
    }

    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;

    let images = CloudinaryUploader::new(HostingConfig::from_env()?)?;
    let mailer = HttpMailer::new(MailerConfig::from_env()?)?;
    tracing::info!(recipient = mailer.recipient(), "Mail transport configured");

    let state = Arc::new(AppState {
        db,
        images,
        mailer,
        admin_token: config.admin_token.clone(),
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr();
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
