//! Label classification: split raw detections into per-label buckets.

use crate::detection::types::{Detection, Label};

/// Detections grouped by recognized label, each bucket in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelBuckets {
    pub grass: Vec<Detection>,
    pub weed: Vec<Detection>,
}

impl LabelBuckets {
    pub fn get(&self, label: Label) -> &[Detection] {
        match label {
            Label::Grass => &self.grass,
            Label::Weed => &self.weed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grass.is_empty() && self.weed.is_empty()
    }
}

/// Detections whose label equals `target`, ignoring case.
pub fn filter_by_label(detections: &[Detection], target: &str) -> Vec<Detection> {
    let target = target.trim();
    detections
        .iter()
        .filter(|d| d.label.trim().eq_ignore_ascii_case(target))
        .cloned()
        .collect()
}

/// Partition into the two recognized buckets. Unrecognized labels are dropped.
pub fn partition(detections: &[Detection]) -> LabelBuckets {
    let buckets = LabelBuckets {
        grass: filter_by_label(detections, Label::Grass.as_str()),
        weed: filter_by_label(detections, Label::Weed.as_str()),
    };

    let dropped = detections.len() - buckets.grass.len() - buckets.weed.len();
    if dropped > 0 {
        tracing::debug!(dropped, "ignoring detections with unrecognized labels");
    }

    buckets
}
