//! Scan loop and filter flags

use std::path::PathBuf;

use clap::{ArgAction, Args};

use crate::config::{
    DEFAULT_CONFIG_DIR, DEFAULT_METRICS_ADDRESS, RunConfig, compile_optional_regex,
    compile_regex, parse_address, parse_bool,
};
use crate::error::ConfigError;

/// Scan loop settings
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Scan")]
pub struct RunArgs {
    /// Seconds between two scans, -1 scans once and exits
    #[arg(
        long,
        env = "COLLECTOR_SCAN_INTERVAL",
        default_value_t = 3600,
        allow_negative_numbers = true
    )]
    pub scan_interval: i64,

    /// Set logging level to debug
    #[arg(long, env = "COLLECTOR_DEBUG")]
    pub debug: bool,

    /// Serve version metrics over HTTP
    #[arg(long, env = "COLLECTOR_EXPOSE_METRICS", default_value_t = true, action = ArgAction::Set, value_parser = parse_bool)]
    pub expose_metrics: bool,

    /// Listen address of the metrics endpoint
    #[arg(long, env = "COLLECTOR_METRICS_ADDRESS", default_value = DEFAULT_METRICS_ADDRESS)]
    pub metrics_address: String,

    /// Namespaces matching this regex are always skipped
    #[arg(long, env = "COLLECTOR_NAMESPACE_SKIP_REGEX")]
    pub namespace_skip_regex: Option<String>,

    /// Images matching this regex are skipped (repeatable)
    #[arg(long = "image-filter", env = "COLLECTOR_IMAGE_FILTER")]
    pub image_filters: Vec<String>,

    /// Directory holding registry-rename and imageNegativeList files
    #[arg(long, env = "COLLECTOR_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Write JSON output without indentation
    #[arg(long, env = "COLLECTOR_JSON_COMPACT")]
    pub json_compact: bool,
}

impl RunArgs {
    /// Validate the patterns and address; list files are loaded separately
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let image_filters = self
            .image_filters
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| compile_regex("image-filter", p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RunConfig {
            scan_interval: self.scan_interval,
            debug: self.debug,
            expose_metrics: self.expose_metrics,
            metrics_address: parse_address(&self.metrics_address)?,
            namespace_skip: compile_optional_regex(
                "namespace-skip-regex",
                self.namespace_skip_regex.as_deref(),
            )?,
            image_filters,
            config_dir: self.config_dir,
            json_compact: self.json_compact,
            registry_renames: Vec::new(),
            negative_list: Vec::new(),
        })
    }
}
