//! Version extraction from workload labels and container images

use crate::client::models::{Annotated, WorkloadRecord};
use crate::config::{APP_NAME_LABEL, APP_VERSION_LABEL, HELM_CHART_LABEL, MANAGED_BY_LABEL};
use crate::error::MergeError;
use crate::models::{ApplicationEntry, ImageReference};
use crate::semantic::Version;

/// Application version of a workload.
///
/// The version label wins. Otherwise the tag of the only container is used,
/// or of the container named by `main_container_key` when there are several.
pub fn app_version(workload: &WorkloadRecord, main_container_key: &str) -> Result<Version, MergeError> {
    let version_error = |source| MergeError::Version {
        workload: workload.name.clone(),
        source,
    };

    if let Some(label) = workload.label(APP_VERSION_LABEL) {
        return Version::parse(label).map_err(version_error);
    }

    let image = match workload.containers.as_slice() {
        [only] => &only.image,
        _ => {
            let main = workload.label(main_container_key).ok_or_else(|| {
                MergeError::MissingMainContainer {
                    workload: workload.name.clone(),
                    label: main_container_key.to_string(),
                }
            })?;
            let container = workload
                .containers
                .iter()
                .find(|c| c.name == main)
                .ok_or_else(|| MergeError::UnknownMainContainer {
                    workload: workload.name.clone(),
                    container: main.to_string(),
                })?;
            &container.image
        }
    };

    ImageReference::parse(image)
        .version(image)
        .map_err(version_error)
}

/// Helm chart version of a workload, `None` when unlabelled or unparsable
pub fn helm_version(workload: &WorkloadRecord) -> Option<Version> {
    let Some(chart) = workload.label(HELM_CHART_LABEL) else {
        log::debug!("{}: no helm version", workload.name);
        return None;
    };

    match Version::parse_helm_chart(chart) {
        Ok(version) => Some(version),
        Err(err) => {
            log::debug!("{}: no helm version: {}", workload.name, err);
            None
        }
    }
}

/// Build the application entry of one workload.
///
/// Returns `None`, after logging a warning, for workloads without a name
/// label or without any usable version.
pub fn application_entry(workload: &WorkloadRecord, main_container_key: &str) -> Option<ApplicationEntry> {
    let Some(name) = workload.label(APP_NAME_LABEL) else {
        log::warn!(
            "{} {}/{} has no {} label, skipping",
            workload.kind,
            workload.namespace,
            workload.name,
            APP_NAME_LABEL
        );
        return None;
    };

    let app_version = match app_version(workload, main_container_key) {
        Ok(version) => Some(version),
        Err(err) => {
            log::debug!("No app version: {}", err);
            None
        }
    };
    let helm_version = helm_version(workload);

    if app_version.is_none() && helm_version.is_none() {
        log::warn!(
            "{} {}/{}: neither app nor helm version found, skipping",
            workload.kind,
            workload.namespace,
            workload.name
        );
        return None;
    }

    let is_managed_by_helm = workload
        .label(MANAGED_BY_LABEL)
        .is_some_and(|v| v.eq_ignore_ascii_case("helm"));

    Some(ApplicationEntry {
        name: name.to_string(),
        app_version,
        helm_version,
        is_managed_by_helm,
    })
}
