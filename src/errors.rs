use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeedScopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prediction service error: {0}")]
    Prediction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WeedScopeError {
    /// Whether the failure originates from the caller's request or an
    /// upstream collaborator rather than from this service itself.
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            WeedScopeError::InvalidInput(_)
                | WeedScopeError::Prediction(_)
                | WeedScopeError::Storage(_)
                | WeedScopeError::Image(_)
                | WeedScopeError::Http(_)
                | WeedScopeError::Json(_)
        )
    }
}

impl serde::Serialize for WeedScopeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type WeedScopeResult<T> = Result<T, WeedScopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = WeedScopeError::Storage("blob missing".into());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Storage error: blob missing\"");
    }

    #[test]
    fn config_errors_are_not_client_facing() {
        assert!(!WeedScopeError::Config("x".into()).is_client_facing());
        assert!(!WeedScopeError::Internal("x".into()).is_client_facing());
        assert!(WeedScopeError::InvalidInput("x".into()).is_client_facing());
        assert!(WeedScopeError::Prediction("x".into()).is_client_facing());
    }
}
