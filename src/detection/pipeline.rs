//! Detection pipeline: load image → remote prediction → top-n selection →
//! annotation → report → persistence.
//!
//! All-or-nothing per call: any failure aborts the analysis and nothing is
//! returned. Artifacts already written by an earlier step are left in place.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{AppConfig, ColorConfig, OutputConfig};
use crate::detection::assemble::build_report;
use crate::detection::select::select_top_n;
use crate::detection::types::{AnalysisReport, ImageSource};
use crate::errors::{WeedScopeError, WeedScopeResult};
use crate::imaging::{content_type_for, Annotator};
use crate::prediction::{CustomVisionClient, PredictionClient};
use crate::storage::{build_stores, BlobStore, Stores};

pub struct GrassWeedDetector {
    predictor: Arc<dyn PredictionClient>,
    predictions: Arc<dyn BlobStore>,
    samples: Arc<dyn BlobStore>,
    output: OutputConfig,
    colors: ColorConfig,
}

impl GrassWeedDetector {
    pub fn new(
        predictor: Arc<dyn PredictionClient>,
        stores: Stores,
        output: OutputConfig,
        colors: ColorConfig,
    ) -> Self {
        Self {
            predictor,
            predictions: stores.predictions,
            samples: stores.samples,
            output,
            colors,
        }
    }

    pub fn from_config(config: &AppConfig) -> WeedScopeResult<Self> {
        let predictor: Arc<dyn PredictionClient> =
            Arc::new(CustomVisionClient::new(&config.prediction));
        let stores = build_stores(&config.storage)?;
        Ok(Self::new(
            predictor,
            stores,
            config.output.clone(),
            config.colors.clone(),
        ))
    }

    /// Resolve an image source to encoded bytes. Empty images are rejected.
    pub async fn load_image(&self, source: ImageSource) -> WeedScopeResult<Vec<u8>> {
        let bytes = match source {
            ImageSource::ByBytes(data) => {
                tracing::debug!(size = data.len(), "image supplied as bytes");
                data
            }
            ImageSource::ByLocation(name) => {
                tracing::debug!(sample = %name, store = self.samples.name(), "loading sample");
                self.samples.read(&name).await.map_err(|e| match e {
                    WeedScopeError::Storage(msg) => WeedScopeError::InvalidInput(format!(
                        "sample image '{name}' unavailable: {msg}"
                    )),
                    other => other,
                })?
            }
        };

        if bytes.is_empty() {
            return Err(WeedScopeError::InvalidInput("image payload is empty".into()));
        }
        Ok(bytes)
    }

    pub async fn analyze(
        &self,
        source: ImageSource,
        top_n: u32,
    ) -> WeedScopeResult<AnalysisReport> {
        let request_id = Uuid::new_v4();
        tracing::info!(%request_id, top_n, "analyzing image");

        let image = self.load_image(source).await?;

        let detections = self.predictor.detect(&image).await.map_err(|e| {
            tracing::error!(
                %request_id,
                provider = self.predictor.name(),
                error = %e,
                "prediction failed"
            );
            e
        })?;
        tracing::debug!(%request_id, detected = detections.len(), "prediction complete");

        let selected = select_top_n(&detections, top_n);

        let image_name = self.output.image_file_name.clone();
        let colors = self.colors.clone();
        let annotator = Annotator::for_output(&image_name);
        let content_type = annotator.content_type();
        let annotated =
            tokio::task::spawn_blocking(move || annotator.annotate(&image, &selected, &colors))
                .await
                .map_err(|e| WeedScopeError::Internal(format!("join: {e}")))??;

        let report = build_report(annotated.areas, &self.output);
        let details = serde_json::to_vec(&report)?;

        self.predictions
            .write(&self.output.info_file_name, details, "application/json")
            .await?;
        self.predictions
            .write(&image_name, annotated.bytes, content_type)
            .await?;

        tracing::info!(
            %request_id,
            areas = report.count,
            summary = %report.summary,
            image = %report.image_url,
            info = %report.info_url,
            "analysis saved"
        );
        Ok(report)
    }

    /// Persisted report by name, parsed back into JSON.
    pub async fn read_report(&self, name: &str) -> WeedScopeResult<serde_json::Value> {
        let bytes = self.predictions.read(name).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Persisted annotated image by name with its content type.
    pub async fn read_image(&self, name: &str) -> WeedScopeResult<(Vec<u8>, &'static str)> {
        let bytes = self.predictions.read(name).await?;
        Ok((bytes, content_type_for(name)))
    }
}
