//! Normalized box → pixel rectangle, and label → outline color.

use crate::config::ColorConfig;
use crate::detection::types::{Label, NormalizedBox, PixelRect};

pub const DEFAULT_GRASS_COLOR: &str = "#A3C566";
pub const DEFAULT_WEED_COLOR: &str = "#D9381E";

/// Scale a normalized box to pixel coordinates, rounding to the nearest pixel.
///
/// Out-of-range fractions are carried through unclamped (float to int casts
/// saturate); the drawing code skips whatever falls outside the canvas.
pub fn to_pixel_rect(bbox: &NormalizedBox, width: u32, height: u32) -> PixelRect {
    let (w, h) = (width as f64, height as f64);
    let x1 = bbox.left * w;
    let y1 = bbox.top * h;
    let x2 = x1 + bbox.width * w;
    let y2 = y1 + bbox.height * h;

    PixelRect {
        top_left: (x1.round() as i32, y1.round() as i32),
        bottom_right: (x2.round() as i32, y2.round() as i32),
    }
}

pub fn default_color(label: Label) -> &'static str {
    match label {
        Label::Grass => DEFAULT_GRASS_COLOR,
        Label::Weed => DEFAULT_WEED_COLOR,
    }
}

/// The configured color when set, otherwise the built-in one for `label`.
pub fn resolve_color(label: Label, configured: &str) -> String {
    let configured = configured.trim();
    if configured.is_empty() {
        default_color(label).to_string()
    } else {
        configured.to_string()
    }
}

impl ColorConfig {
    pub fn for_label(&self, label: Label) -> String {
        match label {
            Label::Grass => resolve_color(label, &self.grass),
            Label::Weed => resolve_color(label, &self.weed),
        }
    }
}
