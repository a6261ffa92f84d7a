pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::detection::GrassWeedDetector;
use crate::errors::{WeedScopeError, WeedScopeResult};

pub struct AppState {
    pub detector: Arc<GrassWeedDetector>,
    /// Per-label selection count used when a request does not name one.
    pub max_predictions: u32,
}

pub fn router(state: Arc<AppState>, body_limit_mb: usize) -> Router {
    let prediction = Router::new()
        .route("/analyze/file", post(handlers::analyze_file))
        .route("/analyze/filename/:file", post(handlers::analyze_filename))
        .route("/details/:filename", get(handlers::read_details))
        .route("/image/:filename", get(handlers::read_image));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/prediction", prediction)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit_mb.saturating_mul(1024 * 1024)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: Arc<AppState>, config: &ServerConfig) -> WeedScopeResult<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| WeedScopeError::Config(format!("invalid listen address: {e}")))?;

    let app = router(state, config.body_limit_mb);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    tracing::info!("server stopped");
    Ok(())
}

impl IntoResponse for WeedScopeError {
    fn into_response(self) -> Response {
        let status = if self.is_client_facing() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        tracing::error!(status = status.as_u16(), error = %self, "request failed");

        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn error_status_follows_origin() {
        let resp = WeedScopeError::InvalidInput("empty".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = WeedScopeError::Storage("down".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = WeedScopeError::Internal("join".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = WeedScopeError::Config("missing".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], 500);
        assert_eq!(value["error"], "Configuration error: missing");
    }
}
