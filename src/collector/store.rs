//! Serialization of collector output

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::Result;
use crate::models::{CollectorEntry, DescriptionEntry};
use crate::storage::Storage;

/// Serialize `value` as JSON, tab-indented unless `compact`
pub fn to_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<Vec<u8>> {
    if compact {
        return Ok(serde_json::to_vec(value)?);
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Sort entries by image and write them as one JSON array
pub async fn store_entries(
    storage: &dyn Storage,
    name: &str,
    mut entries: Vec<CollectorEntry>,
    compact: bool,
) -> Result<()> {
    entries.sort_by(|a, b| a.image.cmp(&b.image));
    let data = to_json(&entries, compact)?;

    log::info!("Storing {} image entries as {}", entries.len(), name);
    storage.write(name, &data).await?;
    Ok(())
}

/// Sort descriptions by namespace and write them as one JSON array
pub async fn store_descriptions(
    storage: &dyn Storage,
    name: &str,
    mut entries: Vec<DescriptionEntry>,
    compact: bool,
) -> Result<()> {
    entries.sort_by(|a, b| a.namespace.cmp(&b.namespace));
    let data = to_json(&entries, compact)?;

    log::info!("Storing {} namespace descriptions as {}", entries.len(), name);
    storage.write(name, &data).await?;
    Ok(())
}
