//! Version collector output

use std::fmt;

use serde::Serialize;

use crate::semantic::Version;

/// Versions of one application, keyed by its `app.kubernetes.io/name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationEntry {
    pub name: String,

    #[serde(serialize_with = "serialize_version")]
    pub app_version: Option<Version>,

    #[serde(serialize_with = "serialize_version")]
    pub helm_version: Option<Version>,

    pub is_managed_by_helm: bool,
}

fn serialize_version<S>(version: &Option<Version>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match version {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

fn display_version(version: &Option<Version>) -> String {
    version
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "<none>".to_string())
}

impl fmt::Display for ApplicationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: appVersion={}, helmVersion={}, managed-by-helm={}",
            self.name,
            display_version(&self.app_version),
            display_version(&self.helm_version),
            self.is_managed_by_helm
        )
    }
}

/// All application entries found in one scan cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionResult {
    pub entries: Vec<ApplicationEntry>,
}
