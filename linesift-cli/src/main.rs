use clap::Parser;
use colored::Colorize;
use linesift::{scan, ScanConfig, ScanError};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ScanError>;

/// Scan a text file and keep every line matching any of a set of
/// case-insensitive regular expressions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the input data file to scan
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Path to the pattern file, one regular expression per line
    #[arg(short = 'p', long = "patterns")]
    patterns: PathBuf,

    /// Path to the output file for matched lines
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Number of worker threads (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_config = ScanConfig {
        input_path: cli.file,
        pattern_path: cli.patterns,
        output_path: cli.output,
        thread_count: cli
            .threads
            .unwrap_or_else(|| ScanConfig::default().thread_count),
        log_level: cli.log_level,
    };

    let config = ScanConfig::load_from(cli.config.as_deref())
        .map_err(|e| ScanError::config_error(e.to_string()))?
        .merge_with_cli(cli_config);

    init_logging(&config.log_level);

    let summary = scan(&config)?;
    println!(
        "Matched {} of {} lines",
        summary.lines_matched.to_string().green(),
        summary.lines_scanned
    );
    Ok(())
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
