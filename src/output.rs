//! CSV output for the sector table.

use csv::{Terminator, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::ConvertError;
use crate::table::{HEADERS, OutputRow};

/// Writes the header and all rows to `writer`.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false) // written explicitly below, even for an empty table
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the table to `path`, replacing any existing file.
pub fn write_table(path: &Path, rows: &[OutputRow]) -> Result<(), ConvertError> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let file = File::create(path).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    write_rows(file, rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_row() -> OutputRow {
        OutputRow {
            station_name: "ABAA".into(),
            sector_id: "ABAA1".into(),
            antenna_type: "Panel, dual".into(),
            blocking_probability: ">99.99".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_rows_header_only_for_empty_table() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("Station name,Sector ID,"));
        assert!(content.trim_end().ends_with("HO neighborhood definition (sector IDs)"));
    }

    #[test]
    fn test_write_rows_quotes_embedded_commas() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[sample_row()]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, "ABAA,ABAA1,,,\"Panel, dual\",,,,,,,>99.99,");
    }

    #[test]
    fn test_write_rows_doubles_embedded_quotes() {
        let row = OutputRow {
            sector_id: "S1".into(),
            antenna_type: "a\"b".into(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_rows(&mut buf, &[row]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert_eq!(content.lines().nth(1).unwrap(), ",S1,,,\"a\"\"b\",,,,,,,,");
    }

    #[test]
    fn test_write_rows_uses_crlf_terminator() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &[OutputRow::default()]).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert!(content.ends_with("HO neighborhood definition (sector IDs)\r\n,,,,,,,,,,,,\r\n"));
        assert_eq!(content.matches('\n').count(), content.matches("\r\n").count());
    }

    #[test]
    fn test_write_table_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sectors_table.csv");
        fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        write_table(&path, &[sample_row()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_write_table_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_table(&path, &[]).unwrap_err();
        assert!(matches!(err, ConvertError::Write { .. }));
    }
}
