pub mod assemble;
pub mod classify;
pub mod geometry;
pub mod pipeline;
pub mod select;
pub mod summary;
pub mod types;

pub use pipeline::GrassWeedDetector;
pub use types::{AnalysisReport, Detection, ImageSource, Label};
