/// Auth Service Main Entry Point
///
/// Starts the HTTP API with:
/// - PostgreSQL connection pool, or in-memory stores when no database is configured
/// - HS256 token issuer built from `JWT_*` settings
use anyhow::{Context, Result};
use auth_service::{
    config::{DatabaseSettings, Settings},
    db::{CompanyStore, PgCompanyStore, PgUserStore, SeedData, UserStore},
    http::{start_http_server, AppState},
    services::AuthService,
    telemetry,
};
use jwt_security::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting Auth Service");

    let settings = Settings::load().context("Failed to load configuration")?;
    info!(environment = %settings.environment, "Configuration loaded successfully");

    settings
        .enforce_secret_policy()
        .context("Refusing to start with the configured JWT secret")?;

    let issuer = Arc::new(TokenIssuer::new(settings.jwt.to_token_config()?));
    info!(
        issuer = %settings.jwt.issuer,
        audience = %settings.jwt.audience,
        expiry_minutes = settings.jwt.expiry_minutes,
        "Token issuer initialized"
    );

    let (users, companies) = build_stores(&settings.database).await?;

    let state = AppState::new(
        AuthService::new(users, issuer),
        companies,
        settings.environment,
    );

    start_http_server(state, &settings.server, shutdown_signal()).await?;

    info!("Auth Service stopped");
    Ok(())
}

async fn build_stores(
    settings: &DatabaseSettings,
) -> Result<(Arc<dyn UserStore>, Arc<dyn CompanyStore>)> {
    let Some(url) = settings.url.as_deref() else {
        warn!("DATABASE_URL not set; using in-memory stores");

        let seed = match &settings.seed_file {
            Some(path) => SeedData::load(path)?,
            None => SeedData::default(),
        };
        info!(
            users = seed.users.len(),
            companies = seed.companies.len(),
            "In-memory stores seeded"
        );

        let (users, companies) = seed.into_stores();
        return Ok((Arc::new(users), Arc::new(companies)));
    };

    let db_pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!(
        "Database pool initialized with {} max connections",
        settings.max_connections
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    Ok((
        Arc::new(PgUserStore::new(db_pool.clone())),
        Arc::new(PgCompanyStore::new(db_pool)),
    ))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
