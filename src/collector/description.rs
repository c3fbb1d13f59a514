//! Namespace description collector

use super::merge::TagMerger;
use crate::client::models::NamespaceRecord;
use crate::config::EntryDefaults;
use crate::models::DescriptionEntry;

/// Resolve team and description of one namespace
pub fn describe(
    namespace: &NamespaceRecord,
    defaults: &EntryDefaults,
    merger: &TagMerger<'_>,
) -> DescriptionEntry {
    let entry = merger.merge_namespace(defaults.entry(&namespace.name, "", ""), namespace);

    DescriptionEntry {
        environment: entry.environment,
        namespace: namespace.name.clone(),
        team: entry.team,
        description: entry.description,
    }
}

/// Plain text list of namespaces without a description
pub fn missing_description_report(environment: &str, entries: &[DescriptionEntry]) -> String {
    let mut namespaces: Vec<&str> = entries
        .iter()
        .filter(|e| e.description.is_empty())
        .map(|e| e.namespace.as_str())
        .collect();
    namespaces.sort_unstable();

    let mut report = format!(
        "Missing description on namespace in environment {}\n",
        environment
    );
    for namespace in namespaces {
        report.push_str(namespace);
        report.push('\n');
    }
    report
}
