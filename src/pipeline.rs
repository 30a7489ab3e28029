//! Parse → join → format → write.

use chrono::Utc;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{ConvertError, read_input};
use crate::output::write_table;
use crate::report::{Reporter, RunSummary, SectorPreview, Stage};
use crate::site::{SiteTable, parse_site_params};
use crate::table::{SectorTable, build_table};
use crate::traffic::{TrafficReport, parse_traffic_report};

/// Both inputs, fully parsed.
#[derive(Debug)]
pub struct ParsedInputs {
    pub sites: SiteTable,
    pub traffic: TrafficReport,
}

impl ParsedInputs {
    /// Samples of the first `count` sectors, in site-file order.
    pub fn previews(&self, count: usize) -> Vec<SectorPreview> {
        self.sites
            .iter()
            .take(count)
            .map(|site| SectorPreview::new(site, self.traffic.get(&site.id)))
            .collect()
    }

    fn summary(&self, table: &SectorTable, config: Option<&PipelineConfig>) -> RunSummary {
        RunSummary {
            generated_at: Utc::now(),
            output_path: config.map(|c| c.output_path.clone()),
            rows: table.rows.len(),
            stations: table.stations,
            site_records: self.sites.len(),
            traffic_records: self.traffic.len(),
            skipped_site_lines: self.sites.skipped_lines,
            skipped_traffic_lines: self.traffic.skipped_lines,
        }
    }
}

/// Reads and parses both input files. Fails before any output is touched.
#[tracing::instrument(skip_all, fields(
    site_params = %config.site_params_path.display(),
    traffic_report = %config.traffic_report_path.display(),
))]
pub fn load_inputs(
    config: &PipelineConfig,
    reporter: &dyn Reporter,
) -> Result<ParsedInputs, ConvertError> {
    reporter.stage(Stage::ParseSiteParams);
    let sites = parse_site_params(&read_input(&config.site_params_path)?);

    reporter.stage(Stage::ParseTrafficReport);
    let traffic = parse_traffic_report(&read_input(&config.traffic_report_path)?);

    Ok(ParsedInputs { sites, traffic })
}

/// Runs the full conversion and writes the CSV table.
#[tracing::instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn run(config: &PipelineConfig, reporter: &dyn Reporter) -> Result<RunSummary, ConvertError> {
    let inputs = load_inputs(config, reporter)?;

    reporter.stage(Stage::BuildTable);
    let table = build_table(&inputs.sites, &inputs.traffic);

    reporter.stage(Stage::WriteCsv);
    write_table(&config.output_path, &table.rows)?;

    let summary = inputs.summary(&table, Some(config));
    reporter.finished(&summary);

    for preview in inputs.previews(config.preview_count) {
        reporter.preview(&preview);
    }

    Ok(summary)
}

/// Parses both inputs and reports a sample without writing anything.
#[tracing::instrument(skip_all, fields(count = count))]
pub fn inspect(
    config: &PipelineConfig,
    count: usize,
    reporter: &dyn Reporter,
) -> Result<RunSummary, ConvertError> {
    let inputs = load_inputs(config, reporter)?;
    let table = build_table(&inputs.sites, &inputs.traffic);

    let traffic_only = inputs
        .traffic
        .sector_ids()
        .filter(|id| inputs.sites.get(id).is_none())
        .count();
    if traffic_only > 0 {
        info!(traffic_only, "Traffic rows without site parameters will be left out of the table");
    }

    for preview in inputs.previews(count) {
        reporter.preview(&preview);
    }

    let summary = inputs.summary(&table, None);
    reporter.finished(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingReporter {
        stages: RefCell<Vec<Stage>>,
        previews: RefCell<Vec<SectorPreview>>,
        finished: RefCell<usize>,
    }

    impl Reporter for RecordingReporter {
        fn stage(&self, stage: Stage) {
            self.stages.borrow_mut().push(stage);
        }

        fn preview(&self, preview: &SectorPreview) {
            self.previews.borrow_mut().push(preview.clone());
        }

        fn finished(&self, _summary: &RunSummary) {
            *self.finished.borrow_mut() += 1;
        }
    }

    fn write_inputs(dir: &Path) -> PipelineConfig {
        let site = dir.join("tx_sector_data.tmp");
        let traffic = dir.join("sector_traffic_loading.txt");
        fs::write(
            &site,
            "SITEID = ABAA2\nTransmitter power(dBW) = 20\nSITEID = ABAA1\nSite elevation(m) = 99\n",
        )
        .unwrap();
        fs::write(
            &traffic,
            format!(
                "header\n{}\nABAA1 10 2 2 0 ***** 1.5\nZZZZ1 1 1 1 0 0 0\n",
                crate::traffic::DATA_BOUNDARY
            ),
        )
        .unwrap();
        PipelineConfig::new(site, traffic, dir.join("out.csv"))
    }

    #[test]
    fn test_run_reports_stages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path());
        let reporter = RecordingReporter::default();

        let summary = run(&config, &reporter).unwrap();

        assert_eq!(
            *reporter.stages.borrow(),
            vec![
                Stage::ParseSiteParams,
                Stage::ParseTrafficReport,
                Stage::BuildTable,
                Stage::WriteCsv
            ]
        );
        assert_eq!(*reporter.finished.borrow(), 1);
        assert_eq!(reporter.previews.borrow().len(), 2);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.stations, 1);
        assert_eq!(summary.traffic_records, 2);
    }

    #[test]
    fn test_missing_site_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(
            dir.path().join("nope.tmp"),
            dir.path().join("nope.txt"),
            dir.path().join("out.csv"),
        );

        let err = run(&config, &RecordingReporter::default()).unwrap_err();
        assert!(err.is_not_found());
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_missing_traffic_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_inputs(dir.path());
        config.traffic_report_path = dir.path().join("absent.txt");

        let err = run(&config, &RecordingReporter::default()).unwrap_err();
        assert!(err.to_string().contains("absent.txt"));
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_inspect_does_not_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_inputs(dir.path());
        let reporter = RecordingReporter::default();

        let summary = inspect(&config, 1, &reporter).unwrap();

        assert!(!config.output_path.exists());
        assert!(summary.output_path.is_none());
        let previews = reporter.previews.borrow();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].sector_id, "ABAA2");
    }
}
