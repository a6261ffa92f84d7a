use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{WeedScopeError, WeedScopeResult};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound for uploaded request bodies, in megabytes.
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_mb: default_body_limit_mb(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit_mb() -> usize {
    20
}

/// Hosted Custom Vision object-detection deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// e.g. `https://<resource>.cognitiveservices.azure.com`
    pub endpoint: String,
    /// Falls back to env var `WEEDSCOPE_PREDICTION_KEY`.
    #[serde(default)]
    pub key: String,
    pub project_id: String,
    /// Name the trained iteration was published under.
    pub published_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Azure,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Blob service root, e.g. `https://<account>.blob.core.windows.net`
    #[serde(default)]
    pub account_url: String,
    #[serde(default)]
    pub container: String,
    /// Container-scoped SAS token. Falls back to env var `WEEDSCOPE_STORAGE_SAS_TOKEN`.
    #[serde(default)]
    pub sas_token: String,
    /// Publicly readable location of the sample images that can be analyzed by name.
    #[serde(default)]
    pub sample_url: String,
    #[serde(default = "default_local_dir")]
    pub local_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            account_url: String::new(),
            container: String::new(),
            sas_token: String::new(),
            sample_url: String::new(),
            local_dir: default_local_dir(),
        }
    }
}

fn default_local_dir() -> PathBuf {
    PathBuf::from("predictions")
}

/// Names the artifacts of an analysis are persisted under. Every analysis
/// overwrites the previous pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_image_file_name")]
    pub image_file_name: String,
    #[serde(default = "default_info_file_name")]
    pub info_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_file_name: default_image_file_name(),
            info_file_name: default_info_file_name(),
        }
    }
}

fn default_image_file_name() -> String {
    "predictions.jpg".to_string()
}

fn default_info_file_name() -> String {
    "predictions.json".to_string()
}

/// Rectangle outline colors as `#RRGGBB`. Empty means "use the built-in default".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColorConfig {
    #[serde(default)]
    pub grass: String,
    #[serde(default)]
    pub weed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Per-label cap on reported detections.
    #[serde(default = "default_max_predictions")]
    pub max_predictions: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_predictions: default_max_predictions(),
        }
    }
}

fn default_max_predictions() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
            log_path: default_log_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from("weedscope.log")
}

impl AppConfig {
    /// Parse, apply environment overrides and validate.
    pub fn from_toml_str(content: &str) -> WeedScopeResult<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Secrets and endpoints may be supplied through the environment instead of
    /// the config file; non-empty environment values win.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("WEEDSCOPE_PREDICTION_ENDPOINT") {
            self.prediction.endpoint = v;
        }
        if let Some(v) = get("WEEDSCOPE_PREDICTION_KEY") {
            self.prediction.key = v;
        }
        if let Some(v) = get("WEEDSCOPE_STORAGE_ACCOUNT_URL") {
            self.storage.account_url = v;
        }
        if let Some(v) = get("WEEDSCOPE_STORAGE_SAS_TOKEN") {
            self.storage.sas_token = v;
        }
        if let Some(v) = get("WEEDSCOPE_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = v;
        }
    }

    pub fn validate(&self) -> WeedScopeResult<()> {
        require("prediction.endpoint", &self.prediction.endpoint)?;
        require("prediction.project_id", &self.prediction.project_id)?;
        require("prediction.published_name", &self.prediction.published_name)?;
        if self.prediction.key.trim().is_empty() {
            tracing::warn!("prediction.key is empty; predictions will be rejected upstream");
        }

        if self.storage.backend == StorageBackend::Azure {
            require("storage.account_url", &self.storage.account_url)?;
            require("storage.container", &self.storage.container)?;
        }

        require("output.image_file_name", &self.output.image_file_name)?;
        require("output.info_file_name", &self.output.info_file_name)?;
        if self.output.image_file_name == self.output.info_file_name {
            return Err(WeedScopeError::Config(
                "output.image_file_name and output.info_file_name must differ".into(),
            ));
        }

        let hex = Regex::new(r"^#[0-9A-Fa-f]{6}$")
            .map_err(|e| WeedScopeError::Internal(format!("color pattern: {e}")))?;
        let colors = [
            ("colors.grass", &self.colors.grass),
            ("colors.weed", &self.colors.weed),
        ];
        for (key, value) in colors {
            let value = value.trim();
            if !value.is_empty() && !hex.is_match(value) {
                return Err(WeedScopeError::Config(format!(
                    "{key} must be a #RRGGBB color, got '{value}'"
                )));
            }
        }

        Ok(())
    }
}

fn require(key: &str, value: &str) -> WeedScopeResult<()> {
    if value.trim().is_empty() {
        return Err(WeedScopeError::Config(format!("{key} must be set")));
    }
    Ok(())
}

fn resolve_config_path(explicit: Option<&Path>) -> WeedScopeResult<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(WeedScopeError::Config(format!(
            "config file {} does not exist",
            path.display()
        )));
    }

    if let Ok(path) = std::env::var("WEEDSCOPE_CONFIG") {
        let candidate = PathBuf::from(path);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found via WEEDSCOPE_CONFIG");
            return Ok(candidate);
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("weedscope").join(CONFIG_FILE_NAME);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in user config directory");
            return Ok(candidate);
        }
    }

    Err(WeedScopeError::Config(
        "config.toml not found next to executable, in working dir or user config dir".into(),
    ))
}

pub fn load_config(explicit: Option<&Path>) -> WeedScopeResult<AppConfig> {
    let path = resolve_config_path(explicit)?;
    let content = std::fs::read_to_string(&path)?;
    let config = AppConfig::from_toml_str(&content)?;
    tracing::info!(
        path = %path.display(),
        backend = ?config.storage.backend,
        project = %config.prediction.project_id,
        "config loaded"
    );
    Ok(config)
}
