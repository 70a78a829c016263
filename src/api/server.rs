use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::info;

use super::{
    services::{health, scan},
    state::AppState,
};
use crate::config::{Config, CorsConfig};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(config: Config) -> Result<(), AnyError> {
    let address = config.server.bind_addr;
    let state = AppState::new(config);
    info!(
        precedence = ?state.handler.precedence(),
        max_upload = %state.config.server.max_upload_bytes,
        "Building scan service"
    );

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "auditscan API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Routes plus body limit and CORS layers
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes.as_usize();
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/", get(health))
        .route("/scan", post(scan))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
}

/// Builds the CORS layer. Entries were checked by config validation, so
/// unparsable values are skipped rather than reported here.
pub fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&cors.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            cors.allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    let methods = if is_wildcard(&cors.allowed_methods) {
        AllowMethods::from(Any)
    } else {
        AllowMethods::list(
            cors.allowed_methods
                .iter()
                .filter_map(|m| Method::from_bytes(m.as_bytes()).ok()),
        )
    };

    let headers = if is_wildcard(&cors.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(
            cors.allowed_headers
                .iter()
                .filter_map(|h| HeaderName::from_bytes(h.as_bytes()).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

fn is_wildcard(entries: &[String]) -> bool {
    entries.iter().any(|e| e == "*")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
