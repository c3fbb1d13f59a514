//! Error types for the image metadata collector

use thiserror::Error;

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Configuration-related errors, raised once at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid regular expression '{pattern}' for {field}: {reason}")]
    InvalidRegex {
        field: &'static str,
        pattern: String,
        reason: String,
    },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: String, reason: String },
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            path: "<yaml>".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors from the Kubernetes API collaborator
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Failed to build Kubernetes client: {0}")]
    Connect(String),

    #[error("Failed to list {resource}: {reason}")]
    List {
        resource: &'static str,
        reason: String,
    },
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        ClusterError::Connect(err.to_string())
    }
}

/// Errors from storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend '{0}' is not available in this build")]
    Unsupported(String),

    #[error("Storage is not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to write '{name}': {reason}")]
    Write { name: String, reason: String },

    #[error("API responded with status {status} instead of 200 OK")]
    UnexpectedStatus { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StorageError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            StorageError::Network("Failed to connect to API".to_string())
        } else {
            StorageError::Network(err.to_string())
        }
    }
}

/// Semantic version and image reference parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("'{0}' does not contain a major.minor.patch version")]
    NoVersion(String),

    #[error("'{0}': image name doesn't include a tag")]
    MissingTag(String),

    #[error("version component '{0}' is out of range")]
    OutOfRange(String),
}

/// Errors signalled by the tag merger and version extractor for a single workload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("{workload}: pod has multiple containers, but '{label}' label is missing")]
    MissingMainContainer { workload: String, label: String },

    #[error("{workload}: pod spec doesn't include container named '{container}'")]
    UnknownMainContainer { workload: String, container: String },

    #[error("{workload}: {source}")]
    Version {
        workload: String,
        #[source]
        source: VersionError,
    },
}
