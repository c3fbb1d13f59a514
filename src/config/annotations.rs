//! Annotation and label key resolution
//!
//! Keys are built once at startup from four prefixes plus optional per-field
//! overrides and never change afterwards.

use crate::models::ScanFlags;

/// Default key naming the main container of a multi-container pod
pub const DEFAULT_MAIN_CONTAINER_KEY: &str = "app.sdase.org/container";

/// Well-known Kubernetes recommended labels
pub const APP_NAME_LABEL: &str = "app.kubernetes.io/name";
pub const APP_VERSION_LABEL: &str = "app.kubernetes.io/version";
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const HELM_CHART_LABEL: &str = "helm.sh/chart";

/// Prefixes and per-field overrides as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationNames {
    /// Prefix for general keys (product, description, environment, container type)
    pub base: String,

    /// Prefix for scan-related keys
    pub scans: String,

    /// Prefix for contact keys (team, slack, rocketchat, email)
    pub contact: String,

    /// Prefix for DefectDojo keys (engagement tags)
    pub defect_dojo: String,

    pub overrides: AnnotationOverrides,

    pub main_container: String,
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            base: "sdase.org/".to_string(),
            scans: "clusterscanner.sdase.org/".to_string(),
            contact: "contact.sdase.org/".to_string(),
            defect_dojo: "defectdojo.sdase.org/".to_string(),
            overrides: AnnotationOverrides::default(),
            main_container: DEFAULT_MAIN_CONTAINER_KEY.to_string(),
        }
    }
}

/// Literal keys replacing the prefix-derived ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationOverrides {
    pub team: Option<String>,
    pub product: Option<String>,
    pub description: Option<String>,
    pub environment: Option<String>,
    pub slack: Option<String>,
    pub rocketchat: Option<String>,
    pub email: Option<String>,
    pub engagement_tags: Option<String>,
    pub container_type: Option<String>,
    pub namespace_filter: Option<String>,
    pub namespace_filter_negated: Option<String>,
}

/// Keys of the scan enablement flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanKeys {
    pub baseimage_lifetime: String,
    pub dependency_check: String,
    pub dependency_track: String,
    pub distroless: String,
    pub lifetime: String,
    pub malware: String,
    pub new_version: String,
    pub run_as_root: String,
    pub run_as_privileged: String,
    pub potentially_running_as_root: String,
    pub potentially_running_as_privileged: String,
}

impl ScanKeys {
    fn with_prefix(prefix: &str) -> Self {
        let key = |name: &str| format!("{}{}", prefix, name);
        Self {
            baseimage_lifetime: key("is-scan-baseimage-lifetime"),
            dependency_check: key("is-scan-dependency-check"),
            dependency_track: key("is-scan-dependency-track"),
            distroless: key("is-scan-distroless"),
            lifetime: key("is-scan-lifetime"),
            malware: key("is-scan-malware"),
            new_version: key("is-scan-new-version"),
            run_as_root: key("is-scan-runasroot"),
            run_as_privileged: key("is-scan-run-as-privileged"),
            potentially_running_as_root: key("is-scan-potentially-running-as-root"),
            potentially_running_as_privileged: key("is-scan-potentially-running-as-privileged"),
        }
    }

    /// Pair every key with the flag it controls
    pub fn bind<'a>(&'a self, flags: &'a mut ScanFlags) -> [(&'a str, &'a mut bool); 11] {
        [
            (self.baseimage_lifetime.as_str(), &mut flags.is_scan_baseimage_lifetime),
            (self.dependency_check.as_str(), &mut flags.is_scan_dependency_check),
            (self.dependency_track.as_str(), &mut flags.is_scan_dependency_track),
            (self.distroless.as_str(), &mut flags.is_scan_distroless),
            (self.lifetime.as_str(), &mut flags.is_scan_lifetime),
            (self.malware.as_str(), &mut flags.is_scan_malware),
            (self.new_version.as_str(), &mut flags.is_scan_new_version),
            (self.run_as_root.as_str(), &mut flags.is_scan_runasroot),
            (self.run_as_privileged.as_str(), &mut flags.is_scan_run_as_privileged),
            (
                self.potentially_running_as_root.as_str(),
                &mut flags.is_potentially_running_as_root,
            ),
            (
                self.potentially_running_as_privileged.as_str(),
                &mut flags.is_potentially_running_as_privileged,
            ),
        ]
    }
}

/// Resolved literal keys for every field the tag merger reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationKeys {
    pub team: String,
    pub product: String,
    pub description: String,
    pub environment: String,
    pub slack: String,
    pub rocketchat: String,
    pub email: String,
    pub engagement_tags: String,
    pub container_type: String,
    pub skip: String,
    pub namespace_filter: String,
    pub namespace_filter_negated: String,
    pub scans: ScanKeys,
    pub scan_lifetime_max_days: String,
    pub main_container: String,
}

impl From<&AnnotationNames> for AnnotationKeys {
    fn from(names: &AnnotationNames) -> Self {
        let o = &names.overrides;
        let pick = |custom: &Option<String>, prefix: &str, name: &str| {
            custom
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| format!("{}{}", prefix, name))
        };

        Self {
            team: pick(&o.team, &names.contact, "team"),
            product: pick(&o.product, &names.base, "product"),
            description: pick(&o.description, &names.base, "description"),
            environment: pick(&o.environment, &names.base, "environment"),
            slack: pick(&o.slack, &names.contact, "slack"),
            rocketchat: pick(&o.rocketchat, &names.contact, "rocketchat"),
            email: pick(&o.email, &names.contact, "email"),
            engagement_tags: pick(&o.engagement_tags, &names.defect_dojo, "engagement-tags"),
            container_type: pick(&o.container_type, &names.base, "container-type"),
            skip: format!("{}skip", names.scans),
            namespace_filter: pick(&o.namespace_filter, &names.scans, "namespace-filter"),
            namespace_filter_negated: pick(
                &o.namespace_filter_negated,
                &names.scans,
                "negated-namespace-filter",
            ),
            scans: ScanKeys::with_prefix(&names.scans),
            scan_lifetime_max_days: format!("{}scan-lifetime-max-days", names.scans),
            main_container: names.main_container.clone(),
        }
    }
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self::from(&AnnotationNames::default())
    }
}
