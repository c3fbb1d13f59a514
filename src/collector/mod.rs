//! Image metadata collector
//!
//! One cycle lists every namespace and its pods, expands the pods into one
//! record per container image, and runs each record through the tag merger,
//! the skip filter and the normalizer before handing the sorted result to the
//! configured storage.

use std::collections::HashMap;

use crate::client::ClusterApi;
use crate::client::models::{ContainerSpecInfo, NamespaceRecord, PodRecord};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CollectorEntry, DescriptionEntry, ImageRecord};
use crate::storage::Storage;

pub mod description;
pub mod merge;
pub mod normalize;
pub mod skip;
pub mod store;

pub use merge::TagMerger;
pub use normalize::Normalizer;
pub use skip::SkipFilter;

/// Expand the pods of one namespace into image records.
///
/// Containers with a status use the spec image and fall back to the image the
/// runtime reports; a status without either is dropped. Spec containers that
/// have no status yet are recorded without an image id.
pub fn images_from_pods(namespace: &str, pods: &[PodRecord]) -> Vec<ImageRecord> {
    let mut records = Vec::new();

    for pod in pods {
        let specs: HashMap<&str, &ContainerSpecInfo> =
            pod.containers.iter().map(|c| (c.name.as_str(), c)).collect();
        let container_count = pod.containers.len().max(pod.statuses.len());

        let record = |container: &str, image: &str, image_id: &str| ImageRecord {
            namespace: namespace.to_string(),
            pod: pod.name.clone(),
            container: container.to_string(),
            container_count,
            image: image.to_string(),
            image_id: image_id.to_string(),
            workload: pod.metadata.clone(),
            security_context: specs.get(container).and_then(|s| s.security_context),
        };

        for status in &pod.statuses {
            let image = specs
                .get(status.name.as_str())
                .map(|s| s.image.as_str())
                .filter(|i| !i.is_empty())
                .unwrap_or(status.image.as_str());
            if image.is_empty() {
                log::debug!(
                    "Container {} in pod {}/{} reports no image",
                    status.name,
                    namespace,
                    pod.name
                );
                continue;
            }
            records.push(record(&status.name, image, &status.image_id));
        }

        for spec in &pod.containers {
            let has_status = pod.statuses.iter().any(|s| s.name == spec.name);
            if has_status || spec.image.is_empty() {
                continue;
            }
            records.push(record(&spec.name, &spec.image, ""));
        }
    }

    records
}

/// Runs the image and description pipelines against one cluster
pub struct ImageCollector<'a> {
    client: &'a dyn ClusterApi,
    storage: &'a dyn Storage,
    config: &'a Config,
}

impl<'a> ImageCollector<'a> {
    pub fn new(client: &'a dyn ClusterApi, storage: &'a dyn Storage, config: &'a Config) -> Self {
        Self {
            client,
            storage,
            config,
        }
    }

    /// Collect, filter and normalize the entries of every running image
    pub async fn collect(&self, namespaces: &[NamespaceRecord]) -> Result<Vec<CollectorEntry>> {
        let merger = TagMerger::new(&self.config.annotations);
        let skip = SkipFilter::from_config(&self.config.run);
        let normalizer = Normalizer::new(self.config.run.registry_renames.clone());
        let defaults = &self.config.defaults;

        let mut entries = Vec::new();
        for namespace in namespaces {
            let pods = self.client.list_pods(&namespace.name).await?;
            let records = images_from_pods(&namespace.name, &pods);
            log::debug!(
                "Namespace {}: {} pods, {} images",
                namespace.name,
                pods.len(),
                records.len()
            );

            for record in &records {
                let base = defaults.entry(&record.namespace, &record.image, &record.image_id);
                let entry = match merger.merge(base, namespace, record) {
                    Ok(entry) => entry,
                    Err(err) => {
                        log::warn!("Dropping image {}: {}", record.image, err);
                        continue;
                    }
                };
                entries.push(normalizer.apply(skip.apply(entry)));
            }
        }

        Ok(entries)
    }

    /// Team and description of every namespace
    pub fn describe(&self, namespaces: &[NamespaceRecord]) -> Vec<DescriptionEntry> {
        let merger = TagMerger::new(&self.config.annotations);
        namespaces
            .iter()
            .map(|ns| description::describe(ns, &self.config.defaults, &merger))
            .collect()
    }

    /// One full cycle: image entries, namespace descriptions and the report
    /// of namespaces without a description
    pub async fn run_cycle(&self) -> Result<()> {
        let environment = self.config.require_environment()?;
        let compact = self.config.run.json_compact;

        let namespaces = self.client.list_namespaces().await?;
        log::info!("Scanning {} namespaces", namespaces.len());

        let entries = self.collect(&namespaces).await?;
        let skipped = entries.iter().filter(|e| e.skip).count();
        log::info!("Collected {} images, {} marked as skipped", entries.len(), skipped);

        let output = self.config.storage.output_file_name(environment);
        store::store_entries(self.storage, &output, entries, compact).await?;

        let descriptions = self.describe(&namespaces);
        let report = description::missing_description_report(environment, &descriptions);
        store::store_descriptions(
            self.storage,
            &format!("{}-service-description.json", environment),
            descriptions,
            compact,
        )
        .await?;
        self.storage
            .write(
                &format!("{}-missing-service-description.txt", environment),
                report.as_bytes(),
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClusterClient;
    use crate::client::models::{ContainerStatusInfo, Metadata, SecurityContextInfo};
    use crate::config::{
        AnnotationKeys, EntryDefaults, KubeConfig, RegistryRename, RunConfig, StorageConfig,
        VersionConfig,
    };
    use crate::error::{ClusterError, Error};
    use crate::storage::MemoryStorage;

    fn pod(name: &str, containers: &[(&str, &str)], statuses: &[(&str, &str, &str)]) -> PodRecord {
        PodRecord {
            name: name.to_string(),
            metadata: Metadata::default(),
            containers: containers
                .iter()
                .map(|(n, i)| ContainerSpecInfo::new(*n, *i))
                .collect(),
            statuses: statuses
                .iter()
                .map(|(n, i, id)| ContainerStatusInfo {
                    name: n.to_string(),
                    image: i.to_string(),
                    image_id: id.to_string(),
                })
                .collect(),
        }
    }

    fn config() -> Config {
        Config {
            annotations: AnnotationKeys::default(),
            defaults: EntryDefaults {
                environment: "prod".to_string(),
                ..Default::default()
            },
            kube: KubeConfig::default(),
            storage: StorageConfig::default(),
            run: RunConfig::default(),
            versions: VersionConfig::default(),
        }
    }

    fn stored_entries(storage: &MemoryStorage, name: &str) -> Vec<serde_json::Value> {
        serde_json::from_slice(&storage.get(name).unwrap()).unwrap()
    }

    #[test]
    fn test_images_prefer_spec_image() {
        let pods = vec![pod(
            "web-0",
            &[("web", "quay.io/web:1.0.0")],
            &[("web", "quay.io/web@sha256:aa", "docker-pullable://quay.io/web@sha256:aa")],
        )];

        let records = images_from_pods("team-x", &pods);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image, "quay.io/web:1.0.0");
        assert_eq!(records[0].image_id, "docker-pullable://quay.io/web@sha256:aa");
        assert_eq!(records[0].container_count, 1);
    }

    #[test]
    fn test_images_fall_back_to_status_image() {
        let pods = vec![pod(
            "web-0",
            &[("web", "")],
            &[("web", "quay.io/web:1.0.0", "sha256:aa")],
        )];

        let records = images_from_pods("team-x", &pods);
        assert_eq!(records[0].image, "quay.io/web:1.0.0");
    }

    #[test]
    fn test_images_skip_status_without_image() {
        let pods = vec![pod("web-0", &[("web", "")], &[("web", "", "")])];
        assert!(images_from_pods("team-x", &pods).is_empty());
    }

    #[test]
    fn test_images_include_containers_without_status() {
        let pods = vec![pod(
            "web-0",
            &[("web", "quay.io/web:1.0.0"), ("proxy", "envoy:1.29")],
            &[("web", "quay.io/web:1.0.0", "sha256:aa")],
        )];

        let records = images_from_pods("team-x", &pods);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].container, "proxy");
        assert_eq!(records[1].image, "envoy:1.29");
        assert!(records[1].image_id.is_empty());
        assert!(records.iter().all(|r| r.container_count == 2));
    }

    #[test]
    fn test_images_carry_security_context() {
        let mut p = pod("web-0", &[("web", "quay.io/web:1.0.0")], &[]);
        p.containers[0].security_context = Some(SecurityContextInfo {
            run_as_non_root: Some(true),
            ..Default::default()
        });

        let records = images_from_pods("team-x", &[p]);
        assert_eq!(
            records[0].security_context.and_then(|c| c.run_as_non_root),
            Some(true)
        );
    }

    #[tokio::test]
    async fn test_run_cycle_writes_all_files() {
        let namespace = NamespaceRecord::new("checkout").with_metadata(
            Metadata::default()
                .with_annotation("contact.sdase.org/team", "fury")
                .with_annotation("sdase.org/description", "Checkout services"),
        );
        let client = MockClusterClient::new()
            .with_namespace(namespace)
            .with_namespace(NamespaceRecord::new("billing"))
            .with_pod(
                "checkout",
                pod("cart-0", &[("cart", "quay.io/cart:2.1.0")], &[]),
            )
            .with_pod(
                "billing",
                pod("invoice-0", &[("invoice", "docker.io/invoice:1.0.0")], &[]),
            );
        let storage = MemoryStorage::new();
        let config = config();

        ImageCollector::new(&client, &storage, &config)
            .run_cycle()
            .await
            .unwrap();

        assert_eq!(
            storage.names(),
            vec![
                "prod-missing-service-description.txt",
                "prod-output.json",
                "prod-service-description.json",
            ]
        );

        let entries = stored_entries(&storage, "prod-output.json");
        assert_eq!(entries[0]["image"], "docker.io/invoice:1.0.0");
        assert_eq!(entries[0]["team"], "nobody");
        assert_eq!(entries[1]["image"], "quay.io/cart:2.1.0");
        assert_eq!(entries[1]["team"], "fury");
        assert_eq!(entries[1]["app_kubernetes_io_name"], "quay.io/cart");
        assert_eq!(entries[1]["app_kubernetes_io_version"], "2.1.0");

        let descriptions = stored_entries(&storage, "prod-service-description.json");
        assert_eq!(descriptions[0]["namespace"], "billing");
        assert_eq!(descriptions[1]["description"], "Checkout services");

        assert_eq!(
            storage.get_string("prod-missing-service-description.txt").unwrap(),
            "Missing description on namespace in environment prod\nbilling\n"
        );
    }

    #[tokio::test]
    async fn test_collect_applies_skip_and_renames() {
        let client = MockClusterClient::new().with_pod(
            "kube-system",
            pod("dns-0", &[("dns", "k8s.gcr.io/coredns:1.11.1")], &[]),
        );
        let mut config = config();
        config.run.namespace_skip = Some(regex::Regex::new("^kube-").unwrap());
        config.run.registry_renames = vec![RegistryRename {
            original: "k8s.gcr.io".to_string(),
            replacement: "registry.k8s.io".to_string(),
        }];
        let storage = MemoryStorage::new();

        let entries = ImageCollector::new(&client, &storage, &config)
            .collect(&[NamespaceRecord::new("kube-system")])
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].skip);
        assert_eq!(entries[0].image, "registry.k8s.io/coredns:1.11.1");
    }

    #[tokio::test]
    async fn test_collect_drops_ambiguous_multi_container_pod() {
        let mut p = pod(
            "web-0",
            &[("web", "quay.io/web:1.0.0"), ("proxy", "envoy:1.29")],
            &[],
        );
        p.metadata = Metadata::default().with_label("app.kubernetes.io/name", "web");
        let client = MockClusterClient::new().with_pod("team-x", p);
        let storage = MemoryStorage::new();
        let config = config();

        let entries = ImageCollector::new(&client, &storage, &config)
            .collect(&[NamespaceRecord::new("team-x")])
            .await
            .unwrap();

        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_run_cycle_requires_environment() {
        let client = MockClusterClient::new();
        let storage = MemoryStorage::new();
        let mut config = config();
        config.defaults.environment.clear();

        let err = ImageCollector::new(&client, &storage, &config)
            .run_cycle()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(storage.names().is_empty());
    }

    #[tokio::test]
    async fn test_run_cycle_propagates_listing_error() {
        let client =
            MockClusterClient::new().with_error(ClusterError::Connect("refused".to_string()));
        let storage = MemoryStorage::new();
        let config = config();

        let err = ImageCollector::new(&client, &storage, &config)
            .run_cycle()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cluster(_)));
    }
}
