use async_trait::async_trait;

use crate::detection::types::Detection;
use crate::errors::WeedScopeResult;

/// Hosted object-detection model. Implementations return every region the
/// model reports, unfiltered and in the order received.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Run detection on encoded image bytes. Transport, authentication and
    /// quota failures are returned as errors; no retry is attempted.
    async fn detect(&self, image: &[u8]) -> WeedScopeResult<Vec<Detection>>;
}
