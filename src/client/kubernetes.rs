//! `kube`-backed cluster client

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use super::ClusterApi;
use super::models::{NamespaceRecord, PodRecord, WorkloadRecord};
use crate::config::KubeConfig;
use crate::error::{ClusterError, Result};

/// Cluster client talking to the Kubernetes API server
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
}

impl std::fmt::Debug for KubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClient").finish_non_exhaustive()
    }
}

impl KubeClient {
    /// Connect using an explicit kubeconfig file and context when given,
    /// otherwise infer the configuration (in-cluster or `~/.kube/config`).
    pub async fn connect(cfg: &KubeConfig) -> Result<Self> {
        let options = KubeConfigOptions {
            context: cfg.context.clone(),
            ..Default::default()
        };

        let mut config = match (&cfg.config_file, &cfg.context) {
            (Some(path), _) => {
                log::info!("Using kubeconfig {}", path.display());
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| ClusterError::Connect(e.to_string()))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ClusterError::Connect(e.to_string()))?
            }
            (None, Some(context)) => {
                log::info!("Using kubeconfig context {}", context);
                Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| ClusterError::Connect(e.to_string()))?
            }
            (None, None) => {
                log::info!("Inferring cluster configuration");
                Config::infer()
                    .await
                    .map_err(|e| ClusterError::Connect(e.to_string()))?
            }
        };

        if let Some(master_url) = &cfg.master_url {
            config.cluster_url = master_url.parse::<http::Uri>().map_err(|e| {
                ClusterError::Connect(format!("invalid master url '{}': {}", master_url, e))
            })?;
        }

        let client = Client::try_from(config).map_err(ClusterError::from)?;
        Ok(Self { client })
    }

    async fn list<K>(&self, resource: &'static str, params: &ListParams) -> Result<Vec<K>>
    where
        K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug,
        <K as kube::Resource>::DynamicType: Default,
    {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api.list(params).await.map_err(|e| ClusterError::List {
            resource,
            reason: e.to_string(),
        })?;
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterApi for KubeClient {
    async fn list_namespaces(&self) -> Result<Vec<NamespaceRecord>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::List {
                resource: "namespaces",
                reason: e.to_string(),
            })?;

        Ok(list.items.iter().map(NamespaceRecord::from).collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodRecord>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::List {
                resource: "pods",
                reason: e.to_string(),
            })?;

        Ok(list.items.iter().map(PodRecord::from).collect())
    }

    async fn list_workloads(&self, label_selector: &str) -> Result<Vec<WorkloadRecord>> {
        let params = ListParams::default().labels(label_selector);

        let deployments: Vec<Deployment> = self.list("deployments", &params).await?;
        let stateful_sets: Vec<StatefulSet> = self.list("statefulsets", &params).await?;
        let daemon_sets: Vec<DaemonSet> = self.list("daemonsets", &params).await?;

        log::debug!(
            "Found {} deployments, {} statefulsets, {} daemonsets for '{}'",
            deployments.len(),
            stateful_sets.len(),
            daemon_sets.len(),
            label_selector
        );

        let workloads = deployments
            .iter()
            .map(WorkloadRecord::from)
            .chain(stateful_sets.iter().map(WorkloadRecord::from))
            .chain(daemon_sets.iter().map(WorkloadRecord::from))
            .collect();

        Ok(workloads)
    }
}
