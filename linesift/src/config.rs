use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Configuration for a scan run.
///
/// Values can be loaded from YAML files in order of precedence:
/// 1. Custom config file specified via `--config`
/// 2. Local `.linesift.yaml` in the current directory
/// 3. Global `$HOME/.config/linesift/config.yaml`
///
/// Command-line arguments take precedence over config file values; the
/// merging behavior is defined in [`ScanConfig::merge_with_cli`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Path to the input data file, scanned one line at a time
    #[serde(default)]
    pub input_path: PathBuf,

    /// Path to the pattern file, one regular expression per line
    #[serde(default)]
    pub pattern_path: PathBuf,

    /// Path to the output file; created or truncated at start
    #[serde(default)]
    pub output_path: PathBuf,

    /// Number of worker threads for pattern matching
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            pattern_path: PathBuf::new(),
            output_path: PathBuf::new(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linesift/config.yaml")),
            // Local config
            Some(PathBuf::from(".linesift.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.input_path.as_os_str().is_empty() {
            self.input_path = cli_config.input_path;
        }
        if !cli_config.pattern_path.as_os_str().is_empty() {
            self.pattern_path = cli_config.pattern_path;
        }
        if !cli_config.output_path.as_os_str().is_empty() {
            self.output_path = cli_config.output_path;
        }
        if cli_config.thread_count != default_thread_count() {
            self.thread_count = cli_config.thread_count;
        }
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
