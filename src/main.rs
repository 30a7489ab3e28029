//! CLI entry point for the sector table tool.
//!
//! Converts a site-parameter dump and a traffic-loading report into one CSV
//! table of sectors grouped by station.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sector_table::config::{
    DEFAULT_OUTPUT_PATH, DEFAULT_PREVIEW_COUNT, DEFAULT_SITE_PARAMS_PATH,
    DEFAULT_TRAFFIC_REPORT_PATH, PipelineConfig,
};
use sector_table::error::ConvertError;
use sector_table::pipeline;
use sector_table::report::TracingReporter;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sector_table")]
#[command(about = "Builds a per-station sector table from radio planning reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Site-parameter dump (SITEID blocks)
    #[arg(long, env = "SITE_PARAMS_PATH", default_value = DEFAULT_SITE_PARAMS_PATH)]
    site_params: PathBuf,

    /// Sector traffic-loading report
    #[arg(long, env = "TRAFFIC_REPORT_PATH", default_value = DEFAULT_TRAFFIC_REPORT_PATH)]
    traffic_report: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert both reports into the CSV sector table
    Convert {
        #[command(flatten)]
        inputs: InputArgs,

        /// CSV file to write (overwritten)
        #[arg(short, long, env = "OUTPUT_CSV_PATH", default_value = DEFAULT_OUTPUT_PATH)]
        output: PathBuf,

        /// Number of parsed sectors to show as a sample after writing
        #[arg(long, default_value_t = DEFAULT_PREVIEW_COUNT)]
        preview: usize,

        /// Render samples and the run summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Parse both reports and show a sample without writing anything
    Inspect {
        #[command(flatten)]
        inputs: InputArgs,

        /// Number of sectors to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_PREVIEW_COUNT)]
        count: usize,

        /// Render samples as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let _guard = match init_tracing() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output,
            preview,
            json,
        } => {
            let config = PipelineConfig::new(inputs.site_params, inputs.traffic_report, output)
                .with_preview_count(preview);
            convert(&config, json)
        }
        Commands::Inspect {
            inputs,
            count,
            json,
        } => {
            let config = PipelineConfig::new(
                inputs.site_params,
                inputs.traffic_report,
                DEFAULT_OUTPUT_PATH,
            );
            let reporter = if json {
                TracingReporter::json()
            } else {
                TracingReporter::new()
            };
            pipeline::inspect(&config, count, &reporter).map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_not_found() => {
            error!(error = %e, "Error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Error processing files: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tracing::instrument(skip_all, fields(output = %config.output_path.display()))]
fn convert(config: &PipelineConfig, json: bool) -> Result<(), ConvertError> {
    let reporter = if json {
        TracingReporter::json()
    } else {
        TracingReporter::new()
    };
    pipeline::run(config, &reporter)?;
    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sector_table.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sector_table.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()?;

    Ok(guard)
}
