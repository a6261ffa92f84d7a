pub mod annotator;

pub use annotator::{content_type_for, AnnotatedImage, Annotator};
