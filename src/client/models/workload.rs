//! Workload snapshot for the version collector

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::api::core::v1::PodTemplateSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

use super::metadata::{Annotated, Metadata};
use super::pod::ContainerSpecInfo;

/// Kind of workload resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkloadKind::Deployment => "Deployment",
            WorkloadKind::StatefulSet => "StatefulSet",
            WorkloadKind::DaemonSet => "DaemonSet",
        };
        write!(f, "{}", s)
    }
}

/// A Deployment, StatefulSet or DaemonSet with its pod template containers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub kind: WorkloadKind,
    pub name: String,

    #[serde(default)]
    pub namespace: String,

    /// Labels and annotations of the workload object itself
    #[serde(flatten)]
    pub metadata: Metadata,

    #[serde(default)]
    pub containers: Vec<ContainerSpecInfo>,
}

impl WorkloadRecord {
    pub fn new(kind: WorkloadKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: String::new(),
            metadata: Metadata::default(),
            containers: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_container(mut self, container: ContainerSpecInfo) -> Self {
        self.containers.push(container);
        self
    }

    fn from_parts(kind: WorkloadKind, meta: &ObjectMeta, template: Option<&PodTemplateSpec>) -> Self {
        let containers = template
            .and_then(|t| t.spec.as_ref())
            .map(|spec| spec.containers.iter().map(ContainerSpecInfo::from).collect())
            .unwrap_or_default();

        Self {
            kind,
            name: meta.name.clone().unwrap_or_default(),
            namespace: meta.namespace.clone().unwrap_or_default(),
            metadata: Metadata::from(meta),
            containers,
        }
    }
}

impl From<&Deployment> for WorkloadRecord {
    fn from(d: &Deployment) -> Self {
        Self::from_parts(
            WorkloadKind::Deployment,
            &d.metadata,
            d.spec.as_ref().map(|s| &s.template),
        )
    }
}

impl From<&StatefulSet> for WorkloadRecord {
    fn from(s: &StatefulSet) -> Self {
        Self::from_parts(
            WorkloadKind::StatefulSet,
            &s.metadata,
            s.spec.as_ref().map(|s| &s.template),
        )
    }
}

impl From<&DaemonSet> for WorkloadRecord {
    fn from(d: &DaemonSet) -> Self {
        Self::from_parts(
            WorkloadKind::DaemonSet,
            &d.metadata,
            d.spec.as_ref().map(|s| &s.template),
        )
    }
}

impl Annotated for WorkloadRecord {
    fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }
}
