//! Pod snapshot with container specs and statuses

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Container, ContainerStatus, Pod};
use serde::{Deserialize, Serialize};

use super::metadata::{Annotated, Metadata};

/// Security-relevant settings of a container spec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContextInfo {
    pub run_as_non_root: Option<bool>,
    pub allow_privilege_escalation: Option<bool>,
    pub privileged: Option<bool>,
}

/// Container as declared in the pod spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpecInfo {
    pub name: String,

    /// Image as written in the spec, may be empty
    #[serde(default)]
    pub image: String,

    /// None when the container declares no security context
    #[serde(default)]
    pub security_context: Option<SecurityContextInfo>,
}

impl ContainerSpecInfo {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            security_context: None,
        }
    }
}

impl From<&Container> for ContainerSpecInfo {
    fn from(container: &Container) -> Self {
        Self {
            name: container.name.clone(),
            image: container.image.clone().unwrap_or_default(),
            security_context: container
                .security_context
                .as_ref()
                .map(|sc| SecurityContextInfo {
                    run_as_non_root: sc.run_as_non_root,
                    allow_privilege_escalation: sc.allow_privilege_escalation,
                    privileged: sc.privileged,
                }),
        }
    }
}

/// Runtime status of a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatusInfo {
    pub name: String,
    pub image: String,
    pub image_id: String,
}

impl From<&ContainerStatus> for ContainerStatusInfo {
    fn from(status: &ContainerStatus) -> Self {
        Self {
            name: status.name.clone(),
            image: status.image.clone(),
            image_id: status.image_id.clone(),
        }
    }
}

/// A pod with everything the metadata collector reads from it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRecord {
    pub name: String,

    #[serde(flatten)]
    pub metadata: Metadata,

    #[serde(default)]
    pub containers: Vec<ContainerSpecInfo>,

    #[serde(default)]
    pub statuses: Vec<ContainerStatusInfo>,
}

impl From<&Pod> for PodRecord {
    fn from(pod: &Pod) -> Self {
        let containers = pod
            .spec
            .as_ref()
            .map(|spec| spec.containers.iter().map(ContainerSpecInfo::from).collect())
            .unwrap_or_default();

        let statuses = pod
            .status
            .as_ref()
            .and_then(|status| status.container_statuses.as_ref())
            .map(|statuses| statuses.iter().map(ContainerStatusInfo::from).collect())
            .unwrap_or_default();

        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            metadata: Metadata::from(&pod.metadata),
            containers,
            statuses,
        }
    }
}

impl Annotated for PodRecord {
    fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }
}
