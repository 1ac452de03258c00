pub mod capabilities;
pub mod description;
pub mod tags;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalize::SpecRecord;

pub use capabilities::{extract_capabilities, operation_action, path_tokens};
pub use description::describe;
pub use tags::extract_tags;

/// Attributes inferred from a record's content, never stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DerivedMetadata {
    pub tags: BTreeSet<String>,
    pub capabilities: BTreeSet<String>,
    pub description: String,
    /// First declared server, or empty.
    pub base_url: String,
}

/// Derive metadata from a record. Pure and deterministic.
pub fn extract(record: &SpecRecord) -> DerivedMetadata {
    DerivedMetadata {
        tags: extract_tags(record),
        capabilities: extract_capabilities(record),
        description: describe(record),
        base_url: record.servers.first().cloned().unwrap_or_default(),
    }
}
