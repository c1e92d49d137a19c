use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use tracing::{debug, info, warn};

use super::matcher::LineMatcher;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::patterns::load_patterns;
use crate::results::ScanSummary;

const BUFFER_CAPACITY: usize = 65536;

/// Scans the configured input file and writes every matching line to the
/// configured output file.
///
/// The pattern set is loaded and compiled once, then each input line is
/// raced against the whole set on a thread pool sized by
/// `config.thread_count`. Lines are processed strictly in input order and
/// every matched line is flushed to the output before the next line is
/// read.
pub fn scan(config: &ScanConfig) -> ScanResult<ScanSummary> {
    info!(
        "Loading pattern set from {}",
        config.pattern_path.display()
    );
    let patterns = load_patterns(&config.pattern_path)?;
    let matcher = LineMatcher::new(patterns);

    if matcher.rejected_count() > 0 {
        warn!(
            "{} of {} patterns are malformed and will never match",
            matcher.rejected_count(),
            matcher.pattern_count()
        );
    }
    debug!(
        "Compiled {} usable patterns",
        matcher.pattern_count() - matcher.rejected_count()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .build()
        .map_err(|e| ScanError::config_error(format!("Failed to build thread pool: {}", e)))?;

    let input = File::open(&config.input_path)
        .map_err(|e| ScanError::from_io(&config.input_path, e))?;
    let output = File::create(&config.output_path)
        .map_err(|e| ScanError::from_io(&config.output_path, e))?;

    let reader = BufReader::with_capacity(BUFFER_CAPACITY, input);
    let mut writer = BufWriter::new(output);
    let mut summary = ScanSummary::new();

    for line in reader.lines() {
        let line = line.map_err(|e| ScanError::read_error(&config.input_path, e))?;
        let matched = pool.install(|| matcher.is_match(&line));
        if matched {
            writeln!(writer, "{}", line)?;
            // Durability over throughput: a matched line reaches the file
            // before the next line is read
            writer.flush()?;
        }
        summary.record_line(matched);
    }

    matcher.metrics().log_stats();
    info!(
        "Scan complete: {} of {} lines matched",
        summary.lines_matched, summary.lines_scanned
    );

    Ok(summary)
}
