//! Name normalizer for image references

use crate::config::RegistryRename;
use crate::models::{CollectorEntry, strip_transport};

const DIGEST_MARKER: &str = "sha256:";

/// Cleans up image and image_id of collector entries
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    renames: Vec<RegistryRename>,
}

impl Normalizer {
    pub fn new(renames: Vec<RegistryRename>) -> Self {
        Self { renames }
    }

    pub fn apply(&self, mut entry: CollectorEntry) -> CollectorEntry {
        entry.image = strip_transport(&entry.image).to_string();
        entry.image_id = strip_transport(&entry.image_id).to_string();

        // The runtime reports a bare digest as image for some pulls
        if entry.image.starts_with(DIGEST_MARKER) {
            entry.image = entry.image_id.clone();
        }

        if entry.image.contains(DIGEST_MARKER) && !entry.image_id.contains(DIGEST_MARKER) {
            entry.image_id = entry.image.clone();
        }

        if entry.image_id.is_empty() {
            entry.image_id = entry.image.clone();
        }

        entry.image = self.rename(entry.image);
        entry.image_id = self.rename(entry.image_id);
        entry
    }

    fn rename(&self, value: String) -> String {
        self.renames.iter().fold(value, |acc, r| {
            if r.original.is_empty() {
                acc
            } else {
                acc.replace(&r.original, &r.replacement)
            }
        })
    }
}
