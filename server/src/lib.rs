// TERRA-X HTTP API server
//
// Exposes the simulation engine over REST: `/health` and `/api/simulate`

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use terrax_core::{
    HealthReport, SimulationEngine, SimulationError, SimulationOutcome, SimulationRequest,
};

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("bind failed on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SimulationEngine>,
}

/// Simulation failure rendered as `{"detail": ...}` with the matching status
#[derive(Debug)]
pub struct ApiError(pub SimulationError);

impl From<SimulationError> for ApiError {
    fn from(err: SimulationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SimulationError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            SimulationError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

/// Build the application router with permissive CORS
pub fn router(engine: Arc<SimulationEngine>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/simulate", post(simulate_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

/// Bind a listener; `host` may be a hostname, an IPv4 literal or a bare IPv6 literal
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })
}

/// Bind and serve until Ctrl-C
pub async fn serve(host: &str, port: u16, engine: Arc<SimulationEngine>) -> Result<()> {
    let listener = bind(host, port).await?;
    info!(
        target: "server",
        url = %format!("http://{}", listener.local_addr()?),
        "TERRA-X engine ready"
    );

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "server", "TERRA-X engine shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: "server", error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.engine.health().await)
}

async fn simulate_handler(
    State(state): State<AppState>,
    Json(req): Json<SimulationRequest>,
) -> std::result::Result<Json<SimulationOutcome>, ApiError> {
    info!(target: "server", location = %req.location, "Simulation requested");
    let outcome = state.engine.simulate(&req).await?;
    Ok(Json(outcome))
}
