//! Parser for the site-parameter dump.
//!
//! The dump is a sequence of blocks, each opened by `SITEID = <id>` and
//! followed by free-form `key = value` lines.

use std::collections::HashMap;
use tracing::{debug, warn};

/// Token that opens every site block.
pub const SITE_MARKER: &str = "SITEID = ";

pub const KEY_ELEVATION: &str = "Site elevation(m)";
pub const KEY_TX_POWER: &str = "Transmitter power(dBW)";
pub const KEY_ANTENNA_PATTERN: &str = "Transmit antenna pattern filename";
pub const KEY_ANTENNA_TYPE: &str = "Transmitter antenna type";
pub const KEY_AZIMUTH: &str = "Transmit antenna azimuth orientation(degrees)";
pub const KEY_TILT: &str = "Transmit antenna mechanical beamtilt(degrees)";
pub const KEY_LATITUDE: &str = "Latitude(dd)";
pub const KEY_LONGITUDE: &str = "Longitude(dd)";

/// One parsed site block.
///
/// Every key from the block is retained; the ones the table needs are
/// exposed through typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteRecord {
    pub id: String,
    params: HashMap<String, String>,
}

impl SiteRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn elevation(&self) -> Option<&str> {
        self.get(KEY_ELEVATION)
    }

    pub fn transmitter_power_dbw(&self) -> Option<&str> {
        self.get(KEY_TX_POWER)
    }

    pub fn antenna_pattern_file(&self) -> Option<&str> {
        self.get(KEY_ANTENNA_PATTERN)
    }

    pub fn antenna_type(&self) -> Option<&str> {
        self.get(KEY_ANTENNA_TYPE)
    }

    pub fn azimuth(&self) -> Option<&str> {
        self.get(KEY_AZIMUTH)
    }

    pub fn tilt(&self) -> Option<&str> {
        self.get(KEY_TILT)
    }

    pub fn latitude(&self) -> Option<&str> {
        self.get(KEY_LATITUDE)
    }

    pub fn longitude(&self) -> Option<&str> {
        self.get(KEY_LONGITUDE)
    }
}

/// Site records in order of first appearance in the dump.
#[derive(Debug, Default)]
pub struct SiteTable {
    records: Vec<SiteRecord>,
    index: HashMap<String, usize>,
    /// Lines inside a block that carried no `=`.
    pub skipped_lines: usize,
    /// Blocks whose id had already been seen.
    pub duplicates: usize,
}

impl SiteTable {
    /// Inserts a record. A repeated id replaces the earlier record but keeps
    /// its original position.
    pub fn insert(&mut self, record: SiteRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => {
                warn!(site_id = %record.id, "Duplicate SITEID block, later block wins");
                self.duplicates += 1;
                self.records[pos] = record;
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&SiteRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SiteRecord> for SiteTable {
    fn from_iter<I: IntoIterator<Item = SiteRecord>>(iter: I) -> Self {
        let mut table = SiteTable::default();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

/// Parses the full text of a site-parameter dump.
///
/// Text before the first marker is ignored, as are lines without `=`.
pub fn parse_site_params(content: &str) -> SiteTable {
    let mut table = SiteTable::default();

    for fragment in content.split(SITE_MARKER).skip(1) {
        let mut lines = fragment.trim().split('\n');
        let id = lines.next().unwrap_or_default().trim();
        let mut record = SiteRecord::new(id);

        for line in lines {
            match line.split_once('=') {
                Some((key, value)) => {
                    record
                        .params
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
                None => {
                    if !line.trim().is_empty() {
                        debug!(site_id = id, line = line.trim(), "Skipping line without '='");
                        table.skipped_lines += 1;
                    }
                }
            }
        }

        table.insert(record);
    }

    debug!(
        sites = table.len(),
        skipped_lines = table.skipped_lines,
        "Parsed site parameters"
    );
    table
}
