//! Namespace description entry

use serde::{Deserialize, Serialize};

/// Ownership and description of one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    pub environment: String,
    pub namespace: String,
    pub team: String,
    pub description: String,
}
