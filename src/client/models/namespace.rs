//! Namespace snapshot

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Namespace;
use serde::{Deserialize, Serialize};

use super::metadata::{Annotated, Metadata};

/// A namespace with its labels and annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    /// Namespace name
    pub name: String,

    /// Namespace labels and annotations
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl NamespaceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Metadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl From<&Namespace> for NamespaceRecord {
    fn from(ns: &Namespace) -> Self {
        Self {
            name: ns.metadata.name.clone().unwrap_or_default(),
            metadata: Metadata::from(&ns.metadata),
        }
    }
}

impl Annotated for NamespaceRecord {
    fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }
}
