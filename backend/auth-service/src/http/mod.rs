/// HTTP API for auth-service
///
/// Public routes: login, liveness test and health check. Profile and
/// company routes sit behind the bearer token middleware.
pub mod account;
pub mod companies;
pub mod middleware;
pub mod response;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use jwt_security::TokenIssuer;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::{Environment, ServerSettings};
use crate::db::CompanyStore;
use crate::services::AuthService;

/// Shared HTTP server state
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub issuer: Arc<TokenIssuer>,
    pub companies: Arc<dyn CompanyStore>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        auth: AuthService,
        companies: Arc<dyn CompanyStore>,
        environment: Environment,
    ) -> Self {
        Self {
            issuer: Arc::clone(auth.issuer()),
            auth,
            companies,
            environment,
        }
    }
}

/// Build the router with all API endpoints
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route("/api/account/profile", get(account::profile))
        .route("/api/company", get(companies::list_companies))
        .route("/api/company/{id}", get(companies::get_company))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_bearer));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/account/login", post(account::login))
        .route("/api/account/test", get(account::test))
        .merge(protected)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Serve until `shutdown` resolves
pub async fn start_http_server(
    state: AppState,
    settings: &ServerSettings,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state, Duration::from_secs(settings.request_timeout_secs));
    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
