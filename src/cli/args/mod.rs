//! Collector CLI arguments
//!
//! Each configuration group is its own flattened `Args` struct, converted
//! into the matching config struct once at startup. Every flag can also be
//! set through a `COLLECTOR_*` environment variable.

use clap::Args;

use crate::config::{AnnotationKeys, AnnotationNames, Config};
use crate::error::Result;

mod annotations;
mod defaults;
mod kube;
mod run;
mod storage;
mod versions;

pub use annotations::AnnotationArgs;
pub use defaults::DefaultArgs;
pub use kube::KubeArgs;
pub use run::RunArgs;
pub use storage::StorageArgs;
pub use versions::VersionArgs;

/// All settings shared by the collector commands
#[derive(Debug, Clone, Args)]
pub struct CollectorArgs {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub kube: KubeArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub annotations: AnnotationArgs,

    #[command(flatten)]
    pub defaults: DefaultArgs,

    #[command(flatten)]
    pub versions: VersionArgs,
}

impl CollectorArgs {
    /// Validate every group and load the list files from the config directory
    pub fn into_config(self) -> Result<Config> {
        let mut run = self.run.into_config()?;
        run.load_files()?;

        Ok(Config {
            annotations: AnnotationKeys::from(&AnnotationNames::from(self.annotations)),
            defaults: self.defaults.into(),
            kube: self.kube.into(),
            storage: self.storage.into(),
            run,
            versions: self.versions.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageKind;
    use crate::error::{ConfigError, Error};
    use crate::models::ContainerType;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: CollectorArgs,
    }

    fn parse(extra: &[&str]) -> CollectorArgs {
        let mut argv = vec!["collector"];
        argv.extend_from_slice(extra);
        TestCli::parse_from(argv).args
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let dir = dir.path().to_str().unwrap();
        let config = parse(&["--config-dir", dir]).into_config().unwrap();

        assert_eq!(config.run.scan_interval, 3600);
        assert!(config.run.expose_metrics);
        assert_eq!(config.run.metrics_address.port(), 9402);
        assert_eq!(config.storage.kind, StorageKind::S3);
        assert_eq!(config.defaults.team, "nobody");
        assert_eq!(config.defaults.scan_lifetime_max_days, 14);
        assert!(!config.defaults.scans.is_scan_dependency_track);
        assert!(config.defaults.scans.is_scan_malware);
        assert_eq!(config.annotations.team, "contact.sdase.org/team");
        assert_eq!(config.versions.team_name, "5xx");
    }

    #[test]
    fn test_flags_map_onto_config() {
        let dir = TempDir::new().unwrap();
        let dir = dir.path().to_str().unwrap();
        let config = parse(&[
            "--config-dir",
            dir,
            "--scan-interval",
            "-1",
            "--environment-name",
            "prod",
            "--engagement-tags",
            "a, b,,c",
            "--container-type",
            "third-party",
            "--is-scan-malware",
            "false",
            "--storage",
            "fs",
            "--annotation-name-contact",
            "owner.example.com/",
        ])
        .into_config()
        .unwrap();

        assert!(config.run.run_once());
        assert_eq!(config.require_environment().unwrap(), "prod");
        assert_eq!(config.defaults.engagement_tags, vec!["a", "b", "c"]);
        assert_eq!(config.defaults.container_type, ContainerType::ThirdParty);
        assert!(!config.defaults.scans.is_scan_malware);
        assert_eq!(config.storage.kind, StorageKind::Fs);
        assert_eq!(config.annotations.team, "owner.example.com/team");
    }

    #[test]
    fn test_boolean_flags_accept_common_spellings() {
        let dir = TempDir::new().unwrap();
        let dir = dir.path().to_str().unwrap();
        let config = parse(&[
            "--config-dir",
            dir,
            "--is-scan-malware",
            "False",
            "--is-scan-lifetime",
            "0",
            "--is-scan-dependency-track",
            "T",
            "--expose-metrics",
            "FALSE",
        ])
        .into_config()
        .unwrap();

        assert!(!config.defaults.scans.is_scan_malware);
        assert!(!config.defaults.scans.is_scan_lifetime);
        assert!(config.defaults.scans.is_scan_dependency_track);
        assert!(!config.run.expose_metrics);
    }

    #[test]
    fn test_boolean_flags_reject_unknown_spellings() {
        let result = TestCli::try_parse_from(["collector", "--is-scan-malware", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_skip_flag() {
        let dir = TempDir::new().unwrap();
        let dir = dir.path().to_str().unwrap();
        let config = parse(&["--config-dir", dir, "--skip"]).into_config().unwrap();
        assert!(config.defaults.skip);
    }

    #[test]
    fn test_invalid_image_filter_fails() {
        let err = parse(&["--image-filter", "(["]).into_config().unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidRegex {
                field: "image-filter",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_namespace_skip_regex_fails() {
        let err = parse(&["--namespace-skip-regex", "*kube"])
            .into_config()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidRegex { .. })));
    }

    #[test]
    fn test_invalid_metrics_address_fails() {
        let err = parse(&["--metrics-address", "nowhere"])
            .into_config()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
    }
}
