//! CLI entry point for the GTFS-RT extract tool.
//!
//! Converts GTFS Realtime protobuf feed files into CSV and JSON extracts of
//! trip updates, vehicle positions and service alerts.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gtfs_rt_extract::config::ExtractConfig;
use gtfs_rt_extract::output::{FormatSelection, Layout};
use gtfs_rt_extract::parser::read_feed;
use gtfs_rt_extract::stats::FeedStats;
use gtfs_rt_extract::{error::ExtractError, extract};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_rt_extract")]
#[command(about = "Extract trip updates, vehicle positions and alerts from GTFS-RT feeds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GTFS-RT protobuf file to CSV and/or JSON
    Extract {
        /// Path to the .pb (or .pb.gz) feed file
        #[arg(value_name = "FEED_FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatSelection::Csv)]
        format: FormatSelection,

        /// Output path (default: input path with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write all entity kinds to one file, or one file per kind
        #[arg(long, value_enum, default_value_t = Layout::Combined)]
        layout: Layout,

        /// Preferred language for alert text
        #[arg(short, long, env = "GTFS_RT_LANGUAGE", default_value = "he")]
        language: String,

        /// Prefix CSV output with a UTF-8 byte-order mark
        #[arg(long, default_value_t = false)]
        excel_bom: bool,

        /// Keep feed order instead of sorting by entity id
        #[arg(long, default_value_t = false)]
        preserve_order: bool,
    },
    /// Print feed header information and entity counts as JSON
    Summary {
        /// Path to the .pb (or .pb.gz) feed file
        #[arg(value_name = "FEED_FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + optional JSON rolling log file
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(log_filter("RUST_LOG", LevelFilter::INFO));

    let (json_layer, _file_guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("gtfs_rt_extract.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(log_filter("RUST_LOG_JSON", LevelFilter::DEBUG));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            format,
            output,
            layout,
            language,
            excel_bom,
            preserve_order,
        } => {
            let config = ExtractConfig {
                input,
                output,
                formats: format,
                layout,
                language,
                excel_bom,
                preserve_order,
            };
            extract::run(&config).inspect_err(log_failure)?;
        }
        Commands::Summary { input } => {
            let feed = read_feed(&input).inspect_err(log_failure)?;
            let stats = FeedStats::from_feed(&feed);

            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &stats)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

fn log_failure(e: &ExtractError) {
    error!(stage = e.stage(), error = %e, "Extraction failed");
}

/// Filter from the `var` environment variable, `default` when it is unset.
fn log_filter(var: &str, default: LevelFilter) -> EnvFilter {
    parse_log_filter(&std::env::var(var).unwrap_or_default(), default)
}

fn parse_log_filter(directives: &str, default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives)
}
