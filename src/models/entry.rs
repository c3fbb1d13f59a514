//! Collector output entry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether an image is built in-house or pulled from a third party
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    #[default]
    Application,
    ThirdParty,
}

impl FromStr for ContainerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "application" => Ok(ContainerType::Application),
            "third-party" => Ok(ContainerType::ThirdParty),
            other => Err(format!(
                "'{}' is not a container type, expected 'application' or 'third-party'",
                other
            )),
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerType::Application => write!(f, "application"),
            ContainerType::ThirdParty => write!(f, "third-party"),
        }
    }
}

/// Scan enablement flags carried by every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFlags {
    pub is_scan_baseimage_lifetime: bool,
    pub is_scan_dependency_check: bool,
    pub is_scan_dependency_track: bool,
    pub is_scan_distroless: bool,
    pub is_scan_lifetime: bool,
    pub is_scan_malware: bool,
    pub is_scan_new_version: bool,
    pub is_scan_runasroot: bool,
    pub is_scan_run_as_privileged: bool,

    /// Observed risk: container may run as root
    pub is_potentially_running_as_root: bool,

    /// Observed risk: container may run privileged
    pub is_potentially_running_as_privileged: bool,
}

impl Default for ScanFlags {
    fn default() -> Self {
        Self {
            is_scan_baseimage_lifetime: true,
            is_scan_dependency_check: true,
            is_scan_dependency_track: false,
            is_scan_distroless: true,
            is_scan_lifetime: true,
            is_scan_malware: true,
            is_scan_new_version: true,
            is_scan_runasroot: true,
            is_scan_run_as_privileged: true,
            is_potentially_running_as_root: true,
            is_potentially_running_as_privileged: true,
        }
    }
}

/// Normalized metadata record for one image, the element of the output file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorEntry {
    pub environment: String,
    pub namespace: String,
    pub image: String,
    pub image_id: String,

    pub team: String,
    pub product: String,
    pub description: String,
    pub slack: String,
    pub rocketchat: String,
    pub email: String,

    pub app_kubernetes_io_name: String,
    pub app_kubernetes_io_version: String,
    pub container_type: ContainerType,

    #[serde(flatten)]
    pub scans: ScanFlags,

    pub scan_lifetime_max_days: i64,
    pub skip: bool,
    pub engagement_tags: Vec<String>,

    /// Resolved namespace filter, consumed by the skip filter
    #[serde(skip)]
    pub namespace_filter: String,

    /// Resolved negated namespace filter, consumed by the skip filter
    #[serde(skip)]
    pub namespace_filter_negated: String,
}
