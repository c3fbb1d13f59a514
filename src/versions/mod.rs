//! Version collector
//!
//! Lists one team's Deployments, StatefulSets and DaemonSets, extracts the
//! application and Helm chart versions of each and keeps one entry per
//! application name.

use std::collections::BTreeMap;

use crate::client::ClusterApi;
use crate::config::Config;
use crate::error::Result;
use crate::models::CollectionResult;

pub mod extract;
pub mod metrics;

pub use metrics::VersionMetrics;

/// Collects application versions from the cluster
pub struct VersionCollector<'a> {
    client: &'a dyn ClusterApi,
    config: &'a Config,
}

impl<'a> VersionCollector<'a> {
    pub fn new(client: &'a dyn ClusterApi, config: &'a Config) -> Self {
        Self { client, config }
    }

    /// Run one scan and return the deduplicated entries ordered by name
    pub async fn collect(&self) -> Result<CollectionResult> {
        let selector = self.config.versions.label_selector(&self.config.annotations.team);
        let workloads = self.client.list_workloads(&selector).await?;
        log::info!("Found {} workloads matching {}", workloads.len(), selector);

        let main_container_key = &self.config.annotations.main_container;
        let mut apps = BTreeMap::new();
        for workload in &workloads {
            if let Some(entry) = extract::application_entry(workload, main_container_key) {
                log::debug!("{}", entry);
                apps.insert(entry.name.clone(), entry);
            }
        }

        Ok(CollectionResult {
            entries: apps.into_values().collect(),
        })
    }
}
