//! Progress and summary reporting for a conversion run.
//!
//! The pipeline never prints directly; it hands events to a [`Reporter`].
//! [`TracingReporter`] turns them into structured log events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::site::SiteRecord;
use crate::traffic::TrafficRecord;

const NOT_AVAILABLE: &str = "N/A";

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ParseSiteParams,
    ParseTrafficReport,
    BuildTable,
    WriteCsv,
}

impl Stage {
    pub fn describe(self) -> &'static str {
        match self {
            Stage::ParseSiteParams => "Parsing sector data",
            Stage::ParseTrafficReport => "Parsing traffic report",
            Stage::BuildTable => "Building sector table",
            Stage::WriteCsv => "Writing CSV table",
        }
    }
}

/// Traffic figures shown in a [`SectorPreview`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficPreview {
    pub circuit_traffic_merl: String,
    pub channels_set: String,
    pub blocking_probability: String,
}

/// A short human-readable sample of one parsed sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorPreview {
    pub sector_id: String,
    pub latitude: String,
    pub longitude: String,
    pub azimuth: String,
    pub traffic: Option<TrafficPreview>,
}

impl SectorPreview {
    pub fn new(site: &SiteRecord, traffic: Option<&TrafficRecord>) -> Self {
        let or_na = |v: Option<&str>| v.unwrap_or(NOT_AVAILABLE).to_string();
        Self {
            sector_id: site.id.clone(),
            latitude: or_na(site.latitude()),
            longitude: or_na(site.longitude()),
            azimuth: or_na(site.azimuth()),
            traffic: traffic.map(|t| TrafficPreview {
                circuit_traffic_merl: t.circuit_traffic.clone(),
                channels_set: t.channels_set.clone(),
                blocking_probability: t.blocking_probability.clone(),
            }),
        }
    }
}

/// Counts describing a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub output_path: Option<PathBuf>,
    pub rows: usize,
    pub stations: usize,
    pub site_records: usize,
    pub traffic_records: usize,
    pub skipped_site_lines: usize,
    pub skipped_traffic_lines: usize,
}

pub trait Reporter {
    fn stage(&self, stage: Stage);
    fn preview(&self, preview: &SectorPreview);
    fn finished(&self, summary: &RunSummary);
}

/// Reports through `tracing`; previews and the summary are optionally rendered as JSON.
#[derive(Debug, Default)]
pub struct TracingReporter {
    pub json: bool,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json() -> Self {
        Self { json: true }
    }
}

impl Reporter for TracingReporter {
    fn stage(&self, stage: Stage) {
        info!(?stage, "{}...", stage.describe());
    }

    fn preview(&self, preview: &SectorPreview) {
        if self.json {
            match serde_json::to_string_pretty(preview) {
                Ok(json) => info!("{}", json),
                Err(e) => tracing::warn!(error = %e, "Failed to render sector preview"),
            }
            return;
        }

        match &preview.traffic {
            Some(t) => info!(
                sector_id = %preview.sector_id,
                location = %format!("{}, {}", preview.latitude, preview.longitude),
                azimuth = %preview.azimuth,
                traffic_merl = %t.circuit_traffic_merl,
                channels_set = %t.channels_set,
                blocking_pct = %t.blocking_probability,
                "Sector sample"
            ),
            None => info!(
                sector_id = %preview.sector_id,
                location = %format!("{}, {}", preview.latitude, preview.longitude),
                azimuth = %preview.azimuth,
                "Sector sample"
            ),
        }
    }

    fn finished(&self, summary: &RunSummary) {
        if let Some(path) = &summary.output_path {
            info!(path = %path.display(), "CSV file created");
        }
        if self.json {
            match serde_json::to_string_pretty(summary) {
                Ok(json) => info!("{}", json),
                Err(e) => tracing::warn!(error = %e, "Failed to render run summary"),
            }
            return;
        }
        info!(
            rows = summary.rows,
            stations = summary.stations,
            site_records = summary.site_records,
            traffic_records = summary.traffic_records,
            skipped_site_lines = summary.skipped_site_lines,
            skipped_traffic_lines = summary.skipped_traffic_lines,
            "Processed {} sectors from {} stations",
            summary.rows,
            summary.stations
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::{KEY_AZIMUTH, KEY_LATITUDE};

    #[test]
    fn test_preview_fills_missing_with_na() {
        let site = SiteRecord::new("ABAA1")
            .with_param(KEY_LATITUDE, "52.1")
            .with_param(KEY_AZIMUTH, "120");
        let preview = SectorPreview::new(&site, None);

        assert_eq!(preview.latitude, "52.1");
        assert_eq!(preview.longitude, "N/A");
        assert_eq!(preview.azimuth, "120");
        assert!(preview.traffic.is_none());
    }

    #[test]
    fn test_preview_keeps_raw_blocking_value() {
        let traffic = TrafficRecord {
            circuit_traffic: "10".into(),
            channels_set: "2".into(),
            blocking_probability: "*****".into(),
            ..Default::default()
        };
        let preview = SectorPreview::new(&SiteRecord::new("S1"), Some(&traffic));
        let t = preview.traffic.unwrap();

        assert_eq!(t.circuit_traffic_merl, "10");
        assert_eq!(t.blocking_probability, "*****");
    }

    #[test]
    fn test_summary_serializes_counts() {
        let summary = RunSummary {
            generated_at: Utc::now(),
            output_path: None,
            rows: 3,
            stations: 2,
            site_records: 3,
            traffic_records: 4,
            skipped_site_lines: 1,
            skipped_traffic_lines: 1,
        };
        let json = serde_json::to_string_pretty(&summary).unwrap();
        assert!(json.contains("\"rows\": 3"));
        assert!(json.contains("\"stations\": 2"));

        TracingReporter::json().finished(&summary);
        TracingReporter::new().finished(&summary);
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        let reporter = TracingReporter::json();
        let preview = SectorPreview::new(&SiteRecord::new("S1"), None);
        reporter.stage(Stage::BuildTable);
        reporter.preview(&preview);
        TracingReporter::new().preview(&preview);
    }
}
