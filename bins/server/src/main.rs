//! Ledgerflow API Server
//!
//! Main entry point for the approval routing and posting service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerflow_api::{AppState, create_router};
use ledgerflow_db::connect_with_pool;
use ledgerflow_shared::AppConfig;
use ledgerflow_shared::email::EmailService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let email_service = EmailService::new(config.email.clone());
    info!(
        enabled = email_service.is_enabled(),
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );
    info!(
        currency_scale = config.posting.currency_scale,
        timezone = %config.posting.timezone,
        default_fiscal_year_start_month = config.posting.default_fiscal_year_start_month,
        "Posting configured"
    );

    let state = AppState {
        db: Arc::new(db),
        posting: config.posting.clone(),
        email_service: Arc::new(email_service),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
