//! Top-N selection of detections per label.
//!
//! Each label bucket is ranked by confidence (stable, so equal scores keep
//! upstream order) and cut to `max(n, 1)` entries independently. Grass
//! entries come first, then weed entries. Confidences are rounded to two
//! decimals here, before anything downstream compares them to thresholds.

use crate::detection::classify::{partition, LabelBuckets};
use crate::detection::types::{Detection, Label, SelectedDetection};

/// Round to two decimal places on the exact binary value, ties to even.
/// `0.305` is stored just below the midpoint and rounds to `0.3`.
pub fn round_confidence(confidence: f64) -> f64 {
    format!("{confidence:.2}").parse().unwrap_or(confidence)
}

pub fn select_top_n(detections: &[Detection], top_n: u32) -> Vec<SelectedDetection> {
    select_from_buckets(&partition(detections), top_n)
}

pub fn select_from_buckets(buckets: &LabelBuckets, top_n: u32) -> Vec<SelectedDetection> {
    let n = top_n.max(1) as usize;

    let mut selected = Vec::new();
    for label in Label::ALL {
        let bucket = buckets.get(label);
        let take = n.min(bucket.len());
        selected.extend(
            ranked(bucket)
                .into_iter()
                .take(take)
                .map(|d| SelectedDetection {
                    label,
                    confidence: round_confidence(d.confidence),
                    bbox: d.bbox,
                }),
        );
        tracing::debug!(label = %label, available = bucket.len(), taken = take, "top-n selection");
    }

    selected
}

fn ranked(bucket: &[Detection]) -> Vec<&Detection> {
    let mut ranked: Vec<&Detection> = bucket.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
}
