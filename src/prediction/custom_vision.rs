//! Azure Custom Vision object-detection prediction over REST.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::PredictionConfig;
use crate::detection::types::{Detection, NormalizedBox};
use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::prediction::provider::PredictionClient;

const API_VERSION: &str = "v3.0";

pub struct CustomVisionClient {
    endpoint: String,
    key: String,
    project_id: String,
    published_name: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagePrediction {
    #[serde(default)]
    predictions: Vec<PredictionModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictionModel {
    tag_name: String,
    probability: f64,
    #[serde(default)]
    bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Deserialize)]
struct BoundingBox {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl CustomVisionClient {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            project_id: config.project_id.clone(),
            published_name: config.published_name.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn detect_url(&self) -> String {
        format!(
            "{}/customvision/{}/Prediction/{}/detect/iterations/{}/image",
            self.endpoint, API_VERSION, self.project_id, self.published_name
        )
    }
}

#[async_trait]
impl PredictionClient for CustomVisionClient {
    fn name(&self) -> &str {
        "custom-vision"
    }

    async fn detect(&self, image: &[u8]) -> WeedScopeResult<Vec<Detection>> {
        tracing::debug!(
            project = %self.project_id,
            iteration = %self.published_name,
            bytes = image.len(),
            "sending detection request"
        );

        let response = self
            .client
            .post(self.detect_url())
            .header("Prediction-Key", &self.key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| WeedScopeError::Prediction(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let err_body = response.text().await.unwrap_or_default();
            return Err(WeedScopeError::Prediction(format!("{}: {}", status, err_body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeedScopeError::Prediction(format!("reading response: {e}")))?;
        let detections = parse_detections(&body)?;

        tracing::info!(count = detections.len(), "detection response received");
        Ok(detections)
    }
}

/// Map a Custom Vision `ImagePrediction` body to detections. Predictions
/// without a bounding box (classification-only tags) get an empty box.
fn parse_detections(body: &str) -> WeedScopeResult<Vec<Detection>> {
    let parsed: ImagePrediction = serde_json::from_str(body)
        .map_err(|e| WeedScopeError::Prediction(format!("unexpected response body: {e}")))?;

    Ok(parsed
        .predictions
        .into_iter()
        .map(|p| {
            let bbox = p
                .bounding_box
                .map(|b| NormalizedBox {
                    left: b.left,
                    top: b.top,
                    width: b.width,
                    height: b.height,
                })
                .unwrap_or_default();
            Detection::new(p.tag_name, p.probability, bbox)
        })
        .collect())
}
