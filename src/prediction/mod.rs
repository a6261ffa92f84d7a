pub mod custom_vision;
pub mod provider;

pub use custom_vision::CustomVisionClient;
pub use provider::PredictionClient;
