pub mod config;
pub mod detection;
pub mod errors;
pub mod imaging;
pub mod logging;
pub mod prediction;
pub mod server;
pub mod storage;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::detection::GrassWeedDetector;
use crate::errors::WeedScopeResult;
use crate::server::AppState;

/// Build the detector from config and serve the HTTP API until shutdown.
pub async fn run_server(config: AppConfig) -> WeedScopeResult<()> {
    let detector = GrassWeedDetector::from_config(&config)?;
    let state = Arc::new(AppState {
        detector: Arc::new(detector),
        max_predictions: config.detection.max_predictions,
    });

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        max_predictions = config.detection.max_predictions,
        "weedscope starting"
    );
    server::serve(state, &config.server).await
}
