use std::path::PathBuf;

pub const DEFAULT_SITE_PARAMS_PATH: &str = "Project/tx_sector_data.tmp";
pub const DEFAULT_TRAFFIC_REPORT_PATH: &str = "Project/reports/sector_traffic_loading.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "sectors_table.csv";
pub const DEFAULT_PREVIEW_COUNT: usize = 2;

/// Input/output locations for one conversion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub site_params_path: PathBuf,
    pub traffic_report_path: PathBuf,
    pub output_path: PathBuf,
    /// Number of parsed sectors reported as a sample after the run.
    pub preview_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            site_params_path: PathBuf::from(DEFAULT_SITE_PARAMS_PATH),
            traffic_report_path: PathBuf::from(DEFAULT_TRAFFIC_REPORT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            preview_count: DEFAULT_PREVIEW_COUNT,
        }
    }
}

impl PipelineConfig {
    pub fn new(
        site_params_path: impl Into<PathBuf>,
        traffic_report_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            site_params_path: site_params_path.into(),
            traffic_report_path: traffic_report_path.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    pub fn with_preview_count(mut self, count: usize) -> Self {
        self.preview_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_project_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.site_params_path, PathBuf::from("Project/tx_sector_data.tmp"));
        assert_eq!(
            config.traffic_report_path,
            PathBuf::from("Project/reports/sector_traffic_loading.txt")
        );
        assert_eq!(config.output_path, PathBuf::from("sectors_table.csv"));
        assert_eq!(config.preview_count, 2);
    }

    #[test]
    fn test_new_keeps_default_preview() {
        let config = PipelineConfig::new("a.tmp", "b.txt", "c.csv").with_preview_count(5);
        assert_eq!(config.output_path, PathBuf::from("c.csv"));
        assert_eq!(config.preview_count, 5);
    }
}
