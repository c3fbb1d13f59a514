//! Collector domain models
//!
//! Input records built from cluster snapshots and the output records written
//! to storage or exported as metrics.

mod application;
mod description;
mod entry;
mod image;

pub use application::{ApplicationEntry, CollectionResult};
pub use description::DescriptionEntry;
pub use entry::{CollectorEntry, ContainerType, ScanFlags};
pub use image::{ImageRecord, ImageReference, strip_transport};
