//! Deployment-wide defaults for collector entries

use crate::models::{CollectorEntry, ContainerType, ScanFlags};

/// Values every collector entry starts from before labels and annotations apply.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDefaults {
    pub environment: String,
    pub team: String,
    pub product: String,
    pub description: String,
    pub slack: String,
    pub rocketchat: String,
    pub email: String,
    pub container_type: ContainerType,
    pub engagement_tags: Vec<String>,
    pub skip: bool,
    pub scans: ScanFlags,
    pub scan_lifetime_max_days: i64,
    pub namespace_filter: String,
    pub namespace_filter_negated: String,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            environment: String::new(),
            team: "nobody".to_string(),
            product: String::new(),
            description: String::new(),
            slack: String::new(),
            rocketchat: String::new(),
            email: String::new(),
            container_type: ContainerType::Application,
            engagement_tags: Vec::new(),
            skip: false,
            scans: ScanFlags::default(),
            scan_lifetime_max_days: 14,
            namespace_filter: String::new(),
            namespace_filter_negated: String::new(),
        }
    }
}

impl EntryDefaults {
    /// Fresh entry for one image in `namespace`
    pub fn entry(
        &self,
        namespace: impl Into<String>,
        image: impl Into<String>,
        image_id: impl Into<String>,
    ) -> CollectorEntry {
        CollectorEntry {
            environment: self.environment.clone(),
            namespace: namespace.into(),
            image: image.into(),
            image_id: image_id.into(),
            team: self.team.clone(),
            product: self.product.clone(),
            description: self.description.clone(),
            slack: self.slack.clone(),
            rocketchat: self.rocketchat.clone(),
            email: self.email.clone(),
            app_kubernetes_io_name: String::new(),
            app_kubernetes_io_version: String::new(),
            container_type: self.container_type,
            scans: self.scans,
            scan_lifetime_max_days: self.scan_lifetime_max_days,
            skip: self.skip,
            engagement_tags: self.engagement_tags.clone(),
            namespace_filter: self.namespace_filter.clone(),
            namespace_filter_negated: self.namespace_filter_negated.clone(),
        }
    }
}

/// Split a comma separated tag list, dropping blanks.
///
/// An empty value or the literal `null` yields no tags.
pub fn parse_tag_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() || value.trim() == "null" {
        return Vec::new();
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a boolean as cluster annotations and environment variables spell it.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("'{}' is not a boolean", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_defaults() {
        let defaults = EntryDefaults::default();
        assert_eq!(defaults.team, "nobody");
        assert_eq!(defaults.scan_lifetime_max_days, 14);
        assert_eq!(defaults.container_type, ContainerType::Application);
        assert!(!defaults.skip);
        assert!(defaults.engagement_tags.is_empty());
        assert!(!defaults.scans.is_scan_dependency_track);
    }

    #[test]
    fn test_entry_copies_defaults() {
        let defaults = EntryDefaults {
            environment: "prod".to_string(),
            engagement_tags: vec!["defaultTag".to_string()],
            ..Default::default()
        };

        let entry = defaults.entry("team-x", "quay.io/app:1.0.0", "");
        assert_eq!(entry.environment, "prod");
        assert_eq!(entry.namespace, "team-x");
        assert_eq!(entry.image, "quay.io/app:1.0.0");
        assert_eq!(entry.team, "nobody");
        assert_eq!(entry.engagement_tags, vec!["defaultTag"]);
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(parse_tag_list("first, second,,third "), vec!["first", "second", "third"]);
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list("null").is_empty());
        assert!(parse_tag_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_bool_spellings() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(value), Ok(true), "{}", value);
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(value), Ok(false), "{}", value);
        }
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("tRUE").is_err());
        assert!(parse_bool("").is_err());
    }
}
