//! Label and annotation access shared by namespaces and workloads

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Anything carrying Kubernetes labels and annotations.
///
/// Namespaces, pods and workloads are read through this trait so the tag
/// merger can treat every metadata source the same way.
pub trait Annotated {
    /// Labels of the object
    fn labels(&self) -> &BTreeMap<String, String>;

    /// Annotations of the object
    fn annotations(&self) -> &BTreeMap<String, String>;

    /// Label value for `key`, ignoring empty values
    fn label(&self, key: &str) -> Option<&str> {
        non_empty(self.labels().get(key))
    }

    /// Annotation value for `key`, ignoring empty values
    fn annotation(&self, key: &str) -> Option<&str> {
        non_empty(self.annotations().get(key))
    }

    /// Annotation value if present, otherwise the label value
    fn annotation_or_label(&self, key: &str) -> Option<&str> {
        self.annotation(key).or_else(|| self.label(key))
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Owned copy of an object's labels and annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl Metadata {
    /// Builder-style helper to add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Builder-style helper to add an annotation
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }
}

impl From<&ObjectMeta> for Metadata {
    fn from(meta: &ObjectMeta) -> Self {
        Self {
            labels: meta.labels.clone().unwrap_or_default(),
            annotations: meta.annotations.clone().unwrap_or_default(),
        }
    }
}

impl Annotated for Metadata {
    fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_wins_over_label() {
        let meta = Metadata::default()
            .with_label("contact.sdase.org/team", "from-label")
            .with_annotation("contact.sdase.org/team", "from-annotation");

        assert_eq!(
            meta.annotation_or_label("contact.sdase.org/team"),
            Some("from-annotation")
        );
    }

    #[test]
    fn test_empty_values_are_absent() {
        let meta = Metadata::default()
            .with_label("team", "")
            .with_annotation("slack", "");

        assert_eq!(meta.label("team"), None);
        assert_eq!(meta.annotation("slack"), None);
        assert_eq!(meta.annotation_or_label("team"), None);
    }

    #[test]
    fn test_from_object_meta_without_maps() {
        let meta = Metadata::from(&ObjectMeta::default());
        assert!(meta.labels.is_empty());
        assert!(meta.annotations.is_empty());
    }
}
