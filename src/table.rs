//! Joins site parameters with traffic rows into the output table.

use serde::Serialize;
use std::collections::HashMap;

use crate::site::{SiteRecord, SiteTable};
use crate::traffic::{TrafficRecord, TrafficReport};
use crate::units::{format_blocking, format_packet_traffic, format_power, pattern_basename};

/// Column labels, in output order.
pub const HEADERS: [&str; 13] = [
    "Station name",
    "Sector ID",
    "Station height above sea level [m]",
    "Transmitter power [W]/[dBW]",
    "Transmit antenna type",
    "Azimuth [°]",
    "Tilt [°]",
    "Generated traffic [mErl]",
    "Generated traffic [kbps]",
    "Number of required channels",
    "Number of assigned radio channels",
    "Actual blocking probability [%]",
    "HO neighborhood definition (sector IDs)",
];

/// One CSV row. Field order matches [`HEADERS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputRow {
    pub station_name: String,
    pub sector_id: String,
    pub height: String,
    pub power: String,
    pub antenna_type: String,
    pub azimuth: String,
    pub tilt: String,
    pub circuit_traffic: String,
    pub packet_traffic_kbps: String,
    pub required_channels: String,
    pub channels_set: String,
    pub blocking_probability: String,
    pub ho_neighborhood: String,
}

/// Sectors sharing a station prefix.
#[derive(Debug)]
pub struct StationGroup<'a> {
    pub name: String,
    pub sectors: Vec<&'a SiteRecord>,
}

#[derive(Debug, Default)]
pub struct SectorTable {
    pub rows: Vec<OutputRow>,
    pub stations: usize,
}

/// Station name for a sector: the id without its last character.
pub fn station_prefix(sector_id: &str) -> &str {
    match sector_id.char_indices().next_back() {
        Some((last, _)) => &sector_id[..last],
        None => sector_id,
    }
}

/// Groups site records by station prefix.
///
/// Stations keep the order in which they are first seen. Sectors within a
/// station are sorted by id.
pub fn group_by_station(sites: &SiteTable) -> Vec<StationGroup<'_>> {
    let mut groups: Vec<StationGroup<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in sites.iter() {
        let prefix = station_prefix(&record.id);
        match positions.get(prefix) {
            Some(&pos) => groups[pos].sectors.push(record),
            None => {
                positions.insert(prefix, groups.len());
                groups.push(StationGroup {
                    name: prefix.to_string(),
                    sectors: vec![record],
                });
            }
        }
    }

    for group in &mut groups {
        group.sectors.sort_by(|a, b| a.id.cmp(&b.id));
    }

    groups
}

/// Antenna shown in the table: pattern file name, else the antenna type.
pub fn antenna_display(site: &SiteRecord) -> String {
    match site.antenna_pattern_file().map(str::trim) {
        Some(pattern) if !pattern.is_empty() => pattern_basename(pattern).to_string(),
        _ => trimmed(site.antenna_type()),
    }
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn traffic_field(traffic: Option<&TrafficRecord>, pick: fn(&TrafficRecord) -> &str) -> String {
    traffic.map(pick).unwrap_or_default().to_string()
}

/// Derives the output row for one sector.
pub fn derive_row(station_name: &str, site: &SiteRecord, traffic: Option<&TrafficRecord>) -> OutputRow {
    OutputRow {
        station_name: station_name.to_string(),
        sector_id: site.id.clone(),
        height: trimmed(site.elevation()),
        power: format_power(site.transmitter_power_dbw()),
        antenna_type: antenna_display(site),
        azimuth: trimmed(site.azimuth()),
        tilt: trimmed(site.tilt()),
        circuit_traffic: traffic_field(traffic, |t| t.circuit_traffic.as_str()),
        packet_traffic_kbps: format_packet_traffic(traffic.map(|t| t.packet_traffic.as_str())),
        required_channels: traffic_field(traffic, |t| t.required_channels.as_str()),
        channels_set: traffic_field(traffic, |t| t.channels_set.as_str()),
        blocking_probability: format_blocking(traffic.map(|t| t.blocking_probability.as_str())),
        ho_neighborhood: String::new(),
    }
}

/// Builds the table rows. Only sectors with a site record appear; traffic
/// rows without one are dropped.
pub fn build_table(sites: &SiteTable, traffic: &TrafficReport) -> SectorTable {
    let groups = group_by_station(sites);
    let mut rows = Vec::with_capacity(sites.len());

    for group in &groups {
        for (i, site) in group.sectors.iter().enumerate() {
            let station_name = if i == 0 { group.name.as_str() } else { "" };
            rows.push(derive_row(station_name, site, traffic.get(&site.id)));
        }
    }

    SectorTable {
        rows,
        stations: groups.len(),
    }
}
