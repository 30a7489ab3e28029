//! Display conversions for the output table.

use crate::traffic::BLOCKING_SENTINEL;

/// Displayed in place of [`BLOCKING_SENTINEL`].
pub const BLOCKING_OVERFLOW: &str = ">99.99";

pub fn dbw_to_watts(dbw: f64) -> f64 {
    10f64.powf(dbw / 10.0)
}

/// Two-decimal rendering; NaN prints as `nan`, matching `inf`/`-inf`.
fn fixed2(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Formats transmitter power as `"{W:.2}W/{dBW}dBW"`.
///
/// The dBW part is always the raw string. If it does not parse, the watts
/// part is left empty. Missing or blank input gives an empty string.
pub fn format_power(raw_dbw: Option<&str>) -> String {
    let raw = match raw_dbw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return String::new(),
    };

    match raw.parse::<f64>() {
        Ok(dbw) => format!("{}W/{raw}dBW", fixed2(dbw_to_watts(dbw))),
        Err(_) => format!("/{raw}dBW"),
    }
}

/// Converts Mbps to kbps with two decimals. Unparseable values pass through.
pub fn format_packet_traffic(raw_mbps: Option<&str>) -> String {
    match raw_mbps {
        Some(raw) => match raw.parse::<f64>() {
            Ok(mbps) => fixed2(mbps * 1000.0),
            Err(_) => raw.to_string(),
        },
        None => String::new(),
    }
}

pub fn format_blocking(raw: Option<&str>) -> String {
    match raw {
        Some(BLOCKING_SENTINEL) => BLOCKING_OVERFLOW.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Final component of a Windows-style path.
pub fn pattern_basename(path: &str) -> &str {
    path.rsplit('\\').next().unwrap_or(path)
}
