//! Turn selected detections into annotated areas and the final report.

use chrono::{DateTime, Local, TimeZone};

use crate::config::{ColorConfig, OutputConfig};
use crate::detection::geometry::to_pixel_rect;
use crate::detection::summary::summarize;
use crate::detection::types::{AnalysisReport, AnnotatedArea, Label, SelectedDetection};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn assemble_areas(
    selected: &[SelectedDetection],
    width: u32,
    height: u32,
    colors: &ColorConfig,
) -> Vec<AnnotatedArea> {
    selected
        .iter()
        .map(|s| AnnotatedArea {
            label: s.label,
            confidence: s.confidence,
            color: colors.for_label(s.label),
            rect: to_pixel_rect(&s.bbox, width, height),
        })
        .collect()
}

/// Confidence of the first area carrying `label`, or `0.0` if there is none.
pub fn first_confidence(areas: &[AnnotatedArea], label: Label) -> f64 {
    areas
        .iter()
        .find(|a| a.label == label)
        .map(|a| a.confidence)
        .unwrap_or(0.0)
}

pub fn build_report(areas: Vec<AnnotatedArea>, output: &OutputConfig) -> AnalysisReport {
    build_report_at(areas, output, &Local::now())
}

pub fn build_report_at<Tz>(
    areas: Vec<AnnotatedArea>,
    output: &OutputConfig,
    now: &DateTime<Tz>,
) -> AnalysisReport
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let grass = first_confidence(&areas, Label::Grass);
    let weed = first_confidence(&areas, Label::Weed);
    let summary = summarize(grass, weed);
    tracing::debug!(grass, weed, summary, "prediction summary");

    AnalysisReport {
        image_url: output.image_file_name.clone(),
        info_url: output.info_file_name.clone(),
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        count: areas.len(),
        summary: summary.to_string(),
        areas,
    }
}
