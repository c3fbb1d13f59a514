//! Container image references and the per-image input record

use serde::{Deserialize, Serialize};

use crate::client::models::{Metadata, SecurityContextInfo};
use crate::error::VersionError;
use crate::semantic::Version;

/// Transport prefix the container runtime puts in front of pulled images
const TRANSPORT_PREFIX: &str = "docker-pullable://";

/// Image reference without the runtime transport prefix
pub fn strip_transport(image: &str) -> &str {
    image.strip_prefix(TRANSPORT_PREFIX).unwrap_or(image)
}

/// A container image reference split into `repository[:tag][@digest]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    /// Split an image reference.
    ///
    /// The tag is only looked for in the last path segment, so a registry
    /// port (`registry:5000/app`) is never mistaken for a tag.
    pub fn parse(image: &str) -> Self {
        let image = strip_transport(image);
        let (name, digest) = match image.split_once('@') {
            Some((name, digest)) => (name, Some(digest.to_string())),
            None => (image, None),
        };

        let segment_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
        match name[segment_start..].rfind(':') {
            Some(offset) => {
                let colon = segment_start + offset;
                Self {
                    repository: name[..colon].to_string(),
                    tag: Some(name[colon + 1..].to_string()).filter(|t| !t.is_empty()),
                    digest,
                }
            }
            None => Self {
                repository: name.to_string(),
                tag: None,
                digest,
            },
        }
    }

    /// Tag of the image, failing when the reference has none
    pub fn require_tag(&self, image: &str) -> Result<&str, VersionError> {
        self.tag
            .as_deref()
            .ok_or_else(|| VersionError::MissingTag(image.to_string()))
    }

    /// Semantic version encoded in the image tag
    pub fn version(&self, image: &str) -> Result<Version, VersionError> {
        Version::parse(self.require_tag(image)?)
    }
}

/// One container image running in one namespace, the unit the tag merger works on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub namespace: String,

    /// Pod the container belongs to
    pub pod: String,

    /// Container name inside the pod
    pub container: String,

    /// Number of containers declared by the pod
    pub container_count: usize,

    pub image: String,

    #[serde(default)]
    pub image_id: String,

    /// Labels and annotations of the pod
    #[serde(flatten)]
    pub workload: Metadata,

    /// Observed security context, when the container spec declares one
    #[serde(default)]
    pub security_context: Option<SecurityContextInfo>,
}
