//! Configuration for the collector
//!
//! The configuration is composed of named groups built once from command line
//! flags and `COLLECTOR_*` environment variables. Everything that can be
//! validated up front (regular expressions, required names, list files) is
//! checked here so a bad setting fails at startup instead of mid-scan.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use regex::Regex;

use crate::error::{ConfigError, Result};

mod annotations;
mod defaults;
mod files;

pub use annotations::{
    APP_NAME_LABEL, APP_VERSION_LABEL, AnnotationKeys, AnnotationNames, AnnotationOverrides,
    DEFAULT_MAIN_CONTAINER_KEY, HELM_CHART_LABEL, MANAGED_BY_LABEL, ScanKeys,
};
pub use defaults::{EntryDefaults, parse_bool, parse_tag_list};
pub use files::{RegistryRename, load_negative_list, load_registry_renames};

/// Default listen address of the metrics endpoint
pub const DEFAULT_METRICS_ADDRESS: &str = "0.0.0.0:9402";

/// Default directory holding the optional list files
pub const DEFAULT_CONFIG_DIR: &str = "/configs";

/// Complete collector configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub annotations: AnnotationKeys,
    pub defaults: EntryDefaults,
    pub kube: KubeConfig,
    pub storage: StorageConfig,
    pub run: RunConfig,
    pub versions: VersionConfig,
}

impl Config {
    /// Fail unless an environment name is set
    pub fn require_environment(&self) -> Result<&str> {
        if self.defaults.environment.trim().is_empty() {
            return Err(ConfigError::Missing("environment-name").into());
        }
        Ok(&self.defaults.environment)
    }
}

/// Scan loop and filter settings
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Seconds between scans, `-1` runs once
    pub scan_interval: i64,

    pub debug: bool,

    pub expose_metrics: bool,

    pub metrics_address: SocketAddr,

    /// Namespaces matching this pattern are always skipped
    pub namespace_skip: Option<Regex>,

    /// Images matching any of these patterns are skipped
    pub image_filters: Vec<Regex>,

    pub config_dir: PathBuf,

    /// Write the output file without indentation
    pub json_compact: bool,

    pub registry_renames: Vec<RegistryRename>,

    /// Image prefixes that are always skipped
    pub negative_list: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            scan_interval: 3600,
            debug: false,
            expose_metrics: true,
            metrics_address: SocketAddr::from(([0, 0, 0, 0], 9402)),
            namespace_skip: None,
            image_filters: Vec::new(),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            json_compact: false,
            registry_renames: Vec::new(),
            negative_list: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Whether every pipeline runs exactly once
    pub fn run_once(&self) -> bool {
        self.scan_interval < 0
    }

    /// Sleep between two scan cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval.max(0) as u64)
    }

    /// Read the registry rename table and negative list from `config_dir`
    pub fn load_files(&mut self) -> Result<()> {
        self.registry_renames = load_registry_renames(&self.config_dir)?;
        self.negative_list = load_negative_list(&self.config_dir)?;
        Ok(())
    }
}

/// Compile an operator-supplied pattern, naming the setting on failure
pub fn compile_regex(field: &'static str, pattern: &str) -> std::result::Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        field,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Compile an optional pattern; blank means unset
pub fn compile_optional_regex(
    field: &'static str,
    pattern: Option<&str>,
) -> std::result::Result<Option<Regex>, ConfigError> {
    match pattern.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => compile_regex(field, p).map(Some),
        None => Ok(None),
    }
}

/// Parse a `host:port` listen address
pub fn parse_address(value: &str) -> std::result::Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("'{}' is not a valid listen address", value)))
}

/// Kubernetes connection settings, all optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeConfig {
    pub config_file: Option<PathBuf>,
    pub context: Option<String>,
    pub master_url: Option<String>,
}

/// Storage backend selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    #[default]
    S3,
    Git,
    Fs,
    Stdout,
    Api,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::S3 => write!(f, "s3"),
            StorageKind::Git => write!(f, "git"),
            StorageKind::Fs => write!(f, "fs"),
            StorageKind::Stdout => write!(f, "stdout"),
            StorageKind::Api => write!(f, "api"),
        }
    }
}

/// Storage backend settings
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub kind: StorageKind,

    /// Name of the image output file, `<environment>-output.json` when unset
    pub file_name: Option<String>,

    pub s3: S3Config,
    pub fs: FsConfig,
    pub git: GitConfig,
    pub api: ApiConfig,
}

impl StorageConfig {
    /// File name the image collector writes to
    pub fn output_file_name(&self, environment: &str) -> String {
        self.file_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("{}-output.json", environment))
    }
}

/// S3 or S3-compatible object storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,

    /// Custom endpoint (MinIO); enables path-style addressing
    pub endpoint: Option<String>,

    pub region: Option<String>,

    /// Key prefix put in front of every object name
    pub prefix: String,
}

/// Local filesystem storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsConfig {
    pub base_dir: PathBuf,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

/// Git repository storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitConfig {
    pub url: String,

    /// Clone directory
    pub directory: PathBuf,

    /// SSH private key used for clone and push
    pub private_key_file: Option<PathBuf>,

    /// HTTPS access token, preferred over the SSH key when set
    pub token: Option<String>,

    pub branch: Option<String>,

    pub author_name: String,

    pub author_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            directory: default_git_directory(),
            private_key_file: None,
            token: None,
            branch: None,
            author_name: "ClusterImageScanner".to_string(),
            author_email: "clusterimagescanner@localhost".to_string(),
        }
    }
}

/// Clone directory under the user cache dir, falling back to the temp dir
pub fn default_git_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("image-metadata-collector")
        .join("repository")
}

/// Push API storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub endpoint: String,
    pub key: String,
    pub signature: String,
}

/// Version collector settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConfig {
    /// Team whose workloads are scanned
    pub team_name: String,

    /// Value of the `cluster_name` metric label
    pub cluster_name: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            team_name: "5xx".to_string(),
            cluster_name: String::new(),
        }
    }
}

impl VersionConfig {
    /// Label selector limiting the scan to one team's workloads
    pub fn label_selector(&self, team_key: &str) -> String {
        format!("{}={}", team_key, self.team_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            annotations: AnnotationKeys::default(),
            defaults: EntryDefaults::default(),
            kube: KubeConfig::default(),
            storage: StorageConfig::default(),
            run: RunConfig::default(),
            versions: VersionConfig::default(),
        }
    }

    #[test]
    fn test_environment_is_required() {
        let mut cfg = config();
        let err = cfg.require_environment().unwrap_err();
        assert!(err.to_string().contains("environment-name"));

        cfg.defaults.environment = "prod".to_string();
        assert_eq!(cfg.require_environment().unwrap(), "prod");
    }

    #[test]
    fn test_run_once() {
        let mut run = RunConfig::default();
        assert!(!run.run_once());
        assert_eq!(run.interval(), Duration::from_secs(3600));

        run.scan_interval = -1;
        assert!(run.run_once());
        assert_eq!(run.interval(), Duration::ZERO);
    }

    #[test]
    fn test_compile_regex_rejects_invalid_pattern() {
        let err = compile_regex("image-filter", "([").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRegex { field: "image-filter", .. }));
    }

    #[test]
    fn test_compile_optional_regex_blank_is_none() {
        assert!(compile_optional_regex("namespace-skip-regex", None).unwrap().is_none());
        assert!(compile_optional_regex("namespace-skip-regex", Some("  ")).unwrap().is_none());
        assert!(compile_optional_regex("namespace-skip-regex", Some("^kube-")).unwrap().is_some());
    }

    #[test]
    fn test_output_file_name() {
        let mut storage = StorageConfig::default();
        assert_eq!(storage.output_file_name("prod"), "prod-output.json");

        storage.file_name = Some("images.json".to_string());
        assert_eq!(storage.output_file_name("prod"), "images.json");
    }

    #[test]
    fn test_label_selector() {
        let versions = VersionConfig {
            team_name: "fury".to_string(),
            cluster_name: "prod-eu".to_string(),
        };
        assert_eq!(
            versions.label_selector("contact.sdase.org/team"),
            "contact.sdase.org/team=fury"
        );
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address(DEFAULT_METRICS_ADDRESS).unwrap(),
            RunConfig::default().metrics_address
        );
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_storage_kind_display() {
        assert_eq!(StorageKind::Stdout.to_string(), "stdout");
        assert_eq!(StorageKind::default(), StorageKind::S3);
    }
}
