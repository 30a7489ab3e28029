//! Parser for the sector traffic-loading report.
//!
//! The report has a free-form header, then a dashed boundary line, then one
//! whitespace-delimited row per sector. Values stay as raw strings.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Line separating the column headings from the data rows.
pub const DATA_BOUNDARY: &str =
    "--------- --------------- ----------------- ------------ --------- ---------------- --------------";

/// Sentinel the report generator prints for blocking probabilities it cannot represent.
pub const BLOCKING_SENTINEL: &str = "*****";

const MIN_COLUMNS: usize = 7;

/// One data row of the traffic report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficRecord {
    /// Circuit-switched traffic in mErl.
    pub circuit_traffic: String,
    pub required_channels: String,
    pub channels_set: String,
    pub channel_shortfall: String,
    /// Percentage, or [`BLOCKING_SENTINEL`].
    pub blocking_probability: String,
    /// Packet-switched traffic in Mbps.
    pub packet_traffic: String,
}

impl TrafficRecord {
    fn from_columns(cols: &[&str]) -> Self {
        Self {
            circuit_traffic: cols[1].to_string(),
            required_channels: cols[2].to_string(),
            channels_set: cols[3].to_string(),
            channel_shortfall: cols[4].to_string(),
            blocking_probability: cols[5].to_string(),
            packet_traffic: cols[6].to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TrafficReport {
    records: HashMap<String, TrafficRecord>,
    /// Non-blank data-section lines with fewer than seven columns.
    pub skipped_lines: usize,
    pub boundary_found: bool,
}

impl TrafficReport {
    pub fn get(&self, sector_id: &str) -> Option<&TrafficRecord> {
        self.records.get(sector_id)
    }

    pub fn insert(&mut self, sector_id: impl Into<String>, record: TrafficRecord) {
        self.records.insert(sector_id.into(), record);
    }

    pub fn contains(&self, sector_id: &str) -> bool {
        self.records.contains_key(sector_id)
    }

    pub fn sector_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses the full text of a traffic-loading report.
pub fn parse_traffic_report(content: &str) -> TrafficReport {
    let mut report = TrafficReport::default();
    let mut data_started = false;

    for line in content.lines() {
        if line.contains(DATA_BOUNDARY) {
            data_started = true;
            report.boundary_found = true;
            continue;
        }

        if !data_started || line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < MIN_COLUMNS {
            debug!(line = line.trim(), columns = cols.len(), "Skipping short traffic row");
            report.skipped_lines += 1;
            continue;
        }

        report.insert(cols[0], TrafficRecord::from_columns(&cols));
    }

    if !report.boundary_found {
        warn!("Traffic report has no data boundary line, no rows parsed");
    }

    debug!(
        sectors = report.len(),
        skipped_lines = report.skipped_lines,
        "Parsed traffic report"
    );
    report
}
