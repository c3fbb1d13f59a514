//! Skip filter
//!
//! Rules only ever set `skip`, never clear it, so applying the filter twice
//! gives the same result as applying it once.

use regex::Regex;

use crate::config::RunConfig;
use crate::models::{CollectorEntry, strip_transport};

/// Operator-configured skip rules
#[derive(Debug, Clone, Default)]
pub struct SkipFilter {
    /// Namespaces matching this pattern are skipped
    namespace_skip: Option<Regex>,

    /// Image prefixes that are always skipped
    negative_list: Vec<String>,

    /// Images matching any of these patterns are skipped
    image_filters: Vec<Regex>,
}

impl SkipFilter {
    pub fn new(
        namespace_skip: Option<Regex>,
        negative_list: Vec<String>,
        image_filters: Vec<Regex>,
    ) -> Self {
        Self {
            namespace_skip,
            negative_list,
            image_filters,
        }
    }

    pub fn from_config(run: &RunConfig) -> Self {
        Self::new(
            run.namespace_skip.clone(),
            run.negative_list.clone(),
            run.image_filters.clone(),
        )
    }

    /// Apply every rule in order to `entry`
    pub fn apply(&self, mut entry: CollectorEntry) -> CollectorEntry {
        if let Some(reason) = self.skip_reason(&entry) {
            log::debug!("Skipping {} in {}: {}", entry.image, entry.namespace, reason);
            entry.skip = true;
        }
        entry
    }

    fn skip_reason(&self, entry: &CollectorEntry) -> Option<String> {
        if let Some(re) = &self.namespace_skip
            && re.is_match(&entry.namespace)
        {
            return Some(format!("namespace matches skip pattern '{}'", re));
        }

        if let Some(true) = namespace_matches(&entry.namespace_filter, &entry.namespace) {
            return Some(format!("namespace filter '{}'", entry.namespace_filter));
        }

        if let Some(false) = namespace_matches(&entry.namespace_filter_negated, &entry.namespace) {
            return Some(format!(
                "negated namespace filter '{}'",
                entry.namespace_filter_negated
            ));
        }

        if entry.skip {
            return Some("skip flag".to_string());
        }

        let image = strip_transport(&entry.image);
        if let Some(prefix) = self.negative_list.iter().find(|p| image.starts_with(p.as_str())) {
            return Some(format!("image negative list entry '{}'", prefix));
        }

        if let Some(re) = self.image_filters.iter().find(|re| re.is_match(&entry.image)) {
            return Some(format!("image filter '{}'", re));
        }

        None
    }
}

/// Evaluate a namespace filter taken from cluster metadata.
///
/// `None` when no filter is set or the pattern doesn't compile.
fn namespace_matches(pattern: &str, namespace: &str) -> Option<bool> {
    if pattern.is_empty() {
        return None;
    }

    match Regex::new(pattern) {
        Ok(re) => Some(re.is_match(namespace)),
        Err(err) => {
            log::warn!("Ignoring invalid namespace filter '{}': {}", pattern, err);
            None
        }
    }
}
