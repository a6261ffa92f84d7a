use serde::{Deserialize, Serialize};

/// The two classes the lawn model is trained on. Anything else the
/// prediction service returns is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Grass,
    Weed,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Grass, Label::Weed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Grass => "Grass",
            Label::Weed => "Weed",
        }
    }

    /// Case-insensitive lookup of a raw tag name.
    pub fn parse(raw: &str) -> Option<Label> {
        Label::ALL
            .into_iter()
            .find(|label| label.matches(raw))
    }

    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding box as fractions of the image size. Values outside `[0, 1]`
/// are not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One region reported by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f64,
    pub bbox: NormalizedBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64, bbox: NormalizedBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub top_left: (i32, i32),
    pub bottom_right: (i32, i32),
}

/// A detection kept for reporting; `confidence` is already rounded to two
/// decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDetection {
    pub label: Label,
    pub confidence: f64,
    pub bbox: NormalizedBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArea {
    #[serde(rename = "predictedLabel")]
    pub label: Label,
    #[serde(rename = "confidenceLevel")]
    pub confidence: f64,
    pub color: String,
    /// Used for drawing only; never leaves the server.
    #[serde(skip)]
    pub rect: PixelRect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "prediction_image_url")]
    pub image_url: String,
    #[serde(rename = "prediction_info_url")]
    pub info_url: String,
    pub timestamp: String,
    #[serde(rename = "top_n")]
    pub count: usize,
    pub summary: String,
    #[serde(rename = "detected_details")]
    pub areas: Vec<AnnotatedArea>,
}

/// Where the image to analyze comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Name of a sample image in the sample store.
    ByLocation(String),
    /// Raw encoded image bytes.
    ByBytes(Vec<u8>),
}
