//! Request handlers for the prediction API.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::detection::{AnalysisReport, ImageSource};
use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::server::AppState;

/// Multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeParams {
    pub top_n: Option<u32>,
}

impl AnalyzeParams {
    fn top_n(&self, state: &AppState) -> u32 {
        self.top_n.unwrap_or(state.max_predictions)
    }
}

/// GET / - welcome message, shows the service is up.
pub async fn root() -> Json<Value> {
    Json(json!({
        "greetings": format!(
            "Hello, and welcome to WeedScope grass and weed detection! (v{})",
            env!("CARGO_PKG_VERSION")
        ),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /prediction/analyze/file - analyze an uploaded image.
pub async fn analyze_file(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> WeedScopeResult<Json<AnalysisReport>> {
    let mut image_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WeedScopeError::InvalidInput(format!("multipart error: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            tracing::debug!(file_name = ?field.file_name(), "upload received");
            let data = field
                .bytes()
                .await
                .map_err(|e| WeedScopeError::InvalidInput(format!("failed to read upload: {e}")))?;
            image_bytes = Some(data.to_vec());
            break;
        }
    }

    let image_bytes = image_bytes.ok_or_else(|| {
        WeedScopeError::InvalidInput(format!("no '{UPLOAD_FIELD}' field in request"))
    })?;

    let top_n = params.top_n(&state);
    let report = state
        .detector
        .analyze(ImageSource::ByBytes(image_bytes), top_n)
        .await?;
    Ok(Json(report))
}

/// POST /prediction/analyze/filename/:file - analyze a stored sample image.
pub async fn analyze_filename(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> WeedScopeResult<Json<AnalysisReport>> {
    let top_n = params.top_n(&state);
    let report = state
        .detector
        .analyze(ImageSource::ByLocation(file), top_n)
        .await?;
    Ok(Json(report))
}

/// GET /prediction/details/:filename
pub async fn read_details(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> WeedScopeResult<Json<Value>> {
    let details = state.detector.read_report(&filename).await?;
    Ok(Json(details))
}

/// GET /prediction/image/:filename
pub async fn read_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> WeedScopeResult<impl IntoResponse> {
    let (bytes, content_type) = state.detector.read_image(&filename).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
