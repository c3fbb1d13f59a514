//! Tag merger
//!
//! Resolves every field of a [`CollectorEntry`] through the precedence
//! defaults, namespace label, namespace annotation, workload label, workload
//! annotation. Only present, non-empty values are applied, so a missing key
//! never clobbers a value resolved earlier.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::client::models::{Annotated, SecurityContextInfo};
use crate::config::{APP_NAME_LABEL, APP_VERSION_LABEL, AnnotationKeys, parse_bool, parse_tag_list};
use crate::error::MergeError;
use crate::models::{CollectorEntry, ContainerType, ImageRecord, ImageReference};

static CHANNEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\w+$").expect("valid channel pattern"));

/// Metadata sources in ascending precedence
struct Layers<'a> {
    sources: Vec<&'a dyn Annotated>,
}

impl<'a> Layers<'a> {
    fn new(sources: Vec<&'a dyn Annotated>) -> Self {
        Self { sources }
    }

    /// Every present value for `key`, lowest precedence first
    fn values<'k>(&'k self, key: &'k str) -> impl Iterator<Item = &'a str> + 'k {
        self.sources
            .iter()
            .copied()
            .flat_map(move |s| [s.label(key), s.annotation(key)])
            .flatten()
    }

    /// Highest-precedence value for `key`
    fn resolve(&self, key: &str) -> Option<&'a str> {
        self.values(key).last()
    }

    fn apply_string(&self, key: &str, slot: &mut String) {
        if let Some(value) = self.resolve(key) {
            *slot = value.to_string();
        }
    }

    fn apply_parsed<T: FromStr>(&self, key: &str, slot: &mut T) {
        self.apply_with(key, slot, |v| v.parse().ok());
    }

    fn apply_bool(&self, key: &str, slot: &mut bool) {
        self.apply_with(key, slot, |v| parse_bool(v).ok());
    }

    /// Apply each value in turn, keeping the previous one when a value fails to parse
    fn apply_with<T>(&self, key: &str, slot: &mut T, parse: impl Fn(&str) -> Option<T>) {
        for value in self.values(key) {
            match parse(value.trim()) {
                Some(parsed) => *slot = parsed,
                None => log::warn!("Ignoring '{}' for {}: not a valid value", value, key),
            }
        }
    }
}

/// Combines labels and annotations with the deployment-wide defaults
#[derive(Debug, Clone)]
pub struct TagMerger<'a> {
    keys: &'a AnnotationKeys,
}

impl<'a> TagMerger<'a> {
    pub fn new(keys: &'a AnnotationKeys) -> Self {
        Self { keys }
    }

    /// Resolve one image record on top of `entry`.
    ///
    /// Fails when the pod runs several containers, carries app labels and
    /// does not say which container they describe.
    pub fn merge(
        &self,
        entry: CollectorEntry,
        namespace: &dyn Annotated,
        record: &ImageRecord,
    ) -> Result<CollectorEntry, MergeError> {
        let workload: &dyn Annotated = &record.workload;
        let layers = Layers::new(vec![namespace, workload]);

        let mut entry = self.apply_fields(entry, &layers);
        self.apply_app_identity(&mut entry, &layers, record)?;

        if let Some(ctx) = record.security_context {
            apply_security_context(&mut entry, ctx);
        }

        Ok(entry)
    }

    /// Resolve namespace-level fields only
    pub fn merge_namespace(&self, entry: CollectorEntry, namespace: &dyn Annotated) -> CollectorEntry {
        self.apply_fields(entry, &Layers::new(vec![namespace]))
    }

    fn apply_fields(&self, mut entry: CollectorEntry, layers: &Layers<'_>) -> CollectorEntry {
        let keys = self.keys;

        layers.apply_string(&keys.environment, &mut entry.environment);
        layers.apply_string(&keys.team, &mut entry.team);
        layers.apply_string(&keys.product, &mut entry.product);
        layers.apply_string(&keys.description, &mut entry.description);
        layers.apply_string(&keys.email, &mut entry.email);
        layers.apply_string(&keys.namespace_filter, &mut entry.namespace_filter);
        layers.apply_string(
            &keys.namespace_filter_negated,
            &mut entry.namespace_filter_negated,
        );

        layers.apply_string(&keys.slack, &mut entry.slack);
        entry.slack = normalize_channel("slack", entry.slack);
        layers.apply_string(&keys.rocketchat, &mut entry.rocketchat);
        entry.rocketchat = normalize_channel("rocketchat", entry.rocketchat);

        layers.apply_parsed::<ContainerType>(&keys.container_type, &mut entry.container_type);
        layers.apply_bool(&keys.skip, &mut entry.skip);
        layers.apply_parsed::<i64>(&keys.scan_lifetime_max_days, &mut entry.scan_lifetime_max_days);
        for (key, flag) in keys.scans.bind(&mut entry.scans) {
            layers.apply_bool(key, flag);
        }

        if let Some(tags) = layers.resolve(&keys.engagement_tags) {
            entry.engagement_tags.extend(parse_tag_list(tags));
        }

        entry
    }

    fn apply_app_identity(
        &self,
        entry: &mut CollectorEntry,
        layers: &Layers<'_>,
        record: &ImageRecord,
    ) -> Result<(), MergeError> {
        let name = layers.resolve(APP_NAME_LABEL);
        let version = layers.resolve(APP_VERSION_LABEL);

        let describes_this_container = if name.is_none() && version.is_none() {
            false
        } else if record.container_count > 1 {
            let main = layers.resolve(&self.keys.main_container).ok_or_else(|| {
                MergeError::MissingMainContainer {
                    workload: record.pod.clone(),
                    label: self.keys.main_container.clone(),
                }
            })?;
            main == record.container
        } else {
            true
        };

        if describes_this_container {
            entry.app_kubernetes_io_name = name.unwrap_or_default().to_string();
            entry.app_kubernetes_io_version = version.unwrap_or_default().to_string();
            return Ok(());
        }

        let reference = ImageReference::parse(&record.image);
        match reference.require_tag(&record.image) {
            Ok(tag) => {
                entry.app_kubernetes_io_name = reference.repository.clone();
                entry.app_kubernetes_io_version = tag.to_string();
            }
            Err(err) => {
                log::warn!("Failed to derive name and version from image: {}", err);
                entry.app_kubernetes_io_name.clear();
                entry.app_kubernetes_io_version.clear();
            }
        }

        Ok(())
    }
}

/// Prefix a chat channel with `#` and warn about names that stay invalid
fn normalize_channel(field: &str, value: String) -> String {
    if value.is_empty() {
        return value;
    }

    let value = if value.starts_with('#') {
        value
    } else {
        log::warn!("# has been forgotten for the {} channel '{}'", field, value);
        format!("#{}", value)
    };

    if !CHANNEL_PATTERN.is_match(&value) {
        log::warn!("{} channel '{}' doesn't match ^#\\w+$", field, value);
    }

    value
}

/// Let the observed container security context decide the risk flags
fn apply_security_context(entry: &mut CollectorEntry, ctx: SecurityContextInfo) {
    if let Some(non_root) = ctx.run_as_non_root {
        entry.scans.is_potentially_running_as_root = !non_root;
    }

    match (ctx.allow_privilege_escalation, ctx.privileged) {
        (Some(true), _) | (_, Some(true)) => {
            entry.scans.is_potentially_running_as_privileged = true;
        }
        (Some(false), Some(false)) => {
            entry.scans.is_potentially_running_as_privileged = false;
        }
        _ => {}
    }
}
