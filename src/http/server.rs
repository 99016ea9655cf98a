//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health handlers
//! - Wire up middleware (tracing, per-request deadline, request ID)
//! - Bind server to listener
//! - Apply configuration updates while running
//! - Stop on the shutdown broadcast

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers::{all_services, gateway_health, one_service, ErrorBody};
use crate::http::request::UuidRequestId;

/// Headroom on top of the probe deadline before a request is cut off.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(1);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ArcSwap<GatewayConfig>>,
}

/// HTTP server for the health gateway.
pub struct GatewayServer {
    router: Router,
    state: AppState,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let state = AppState {
            config: Arc::new(ArcSwap::from_pointee(config)),
        };

        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(gateway_health))
            .route("/health/services", get(all_services))
            .route("/health/services/{name}", get(one_service))
            .layer(middleware::from_fn_with_state(state.clone(), request_deadline))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http()),
            )
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configs received on `config_updates` replace the current one. Only the
    /// listener is fixed at startup.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.state.config.load().services.len(),
            "Health gateway starting"
        );

        let shared = self.state.config.clone();
        let updater = tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!(
                    services = new_config.services.len(),
                    timeout_ms = new_config.probe.timeout_ms,
                    "Applying configuration update"
                );
                shared.store(Arc::new(new_config));
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        updater.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> Arc<GatewayConfig> {
        self.state.config.load_full()
    }
}

/// Cut off a request that outlives the current probe timeout plus slack.
///
/// The deadline is read from the live config on every request so it follows
/// reloads of `probe.timeout_ms`.
async fn request_deadline(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let deadline = state.config.load().probe.timeout() + REQUEST_TIMEOUT_SLACK;
    let path = request.uri().path().to_string();

    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(path = %path, deadline = ?deadline, "Request exceeded deadline");
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ErrorBody { error: format!("request exceeded {:?}", deadline) }),
            )
                .into_response()
        }
    }
}
