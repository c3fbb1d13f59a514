//! Collector command handlers
//!
//! Every pipeline is a sequential loop of scan, write and sleep. The commands
//! run their pipelines side by side and stop at the first fatal error.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::cli::CommandContext;
use crate::collector::ImageCollector;
use crate::error::Result;
use crate::models::CollectionResult;
use crate::storage::Storage;
use crate::versions::{VersionCollector, VersionMetrics, metrics};

/// How often the gauges pick up the latest version scan
const METRICS_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

type LatestResult = Arc<RwLock<CollectionResult>>;

/// `images`: metadata and description collector
pub async fn images(ctx: &CommandContext, storage: &dyn Storage) -> Result<()> {
    image_loop(ctx, storage).await
}

/// `versions`: version collector plus metrics endpoint
pub async fn versions(ctx: &CommandContext) -> Result<()> {
    let latest = LatestResult::default();
    tokio::try_join!(version_loop(ctx, &latest), serve_metrics(ctx, &latest))?;
    Ok(())
}

/// `run`: both collectors plus metrics endpoint
pub async fn run(ctx: &CommandContext, storage: &dyn Storage) -> Result<()> {
    let latest = LatestResult::default();
    tokio::try_join!(
        image_loop(ctx, storage),
        version_loop(ctx, &latest),
        serve_metrics(ctx, &latest)
    )?;
    Ok(())
}

async fn image_loop(ctx: &CommandContext, storage: &dyn Storage) -> Result<()> {
    let config = &ctx.config;
    config.require_environment()?;
    let collector = ImageCollector::new(ctx.client.as_ref(), storage, config);

    loop {
        collector.run_cycle().await?;
        if config.run.run_once() {
            return Ok(());
        }
        log::info!("Next image scan in {}s", config.run.scan_interval);
        tokio::time::sleep(config.run.interval()).await;
    }
}

async fn version_loop(ctx: &CommandContext, latest: &LatestResult) -> Result<()> {
    let config = &ctx.config;
    let collector = VersionCollector::new(ctx.client.as_ref(), config);

    loop {
        let result = collector.collect().await?;
        log::info!("Collected versions of {} applications", result.entries.len());
        for entry in &result.entries {
            log::info!("{}", entry);
        }
        *latest.write().unwrap_or_else(PoisonError::into_inner) = result;

        if config.run.run_once() {
            return Ok(());
        }
        log::info!("Next version scan in {}s", config.run.scan_interval);
        tokio::time::sleep(config.run.interval()).await;
    }
}

/// Serve the version gauges unless disabled or running once
async fn serve_metrics(ctx: &CommandContext, latest: &LatestResult) -> Result<()> {
    let config = &ctx.config;
    if config.run.run_once() || !config.run.expose_metrics {
        log::debug!("Metrics endpoint disabled");
        return Ok(());
    }

    let gauges = VersionMetrics::new(&config.versions.cluster_name, &config.versions.team_name)?;
    let source = Arc::clone(latest);
    let provider: metrics::ResultProvider = Arc::new(move || {
        source
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    });

    tokio::spawn(metrics::refresh_loop(
        gauges.clone(),
        provider,
        METRICS_REFRESH_INTERVAL,
    ));
    metrics::serve(gauges, config.run.metrics_address).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClusterClient;
    use crate::client::models::{
        ContainerSpecInfo, Metadata, NamespaceRecord, PodRecord, WorkloadKind, WorkloadRecord,
    };
    use crate::config::{
        AnnotationKeys, Config, EntryDefaults, KubeConfig, RunConfig, StorageConfig,
        VersionConfig,
    };
    use crate::error::Error;
    use crate::storage::MemoryStorage;

    fn context(client: MockClusterClient) -> CommandContext {
        let config = Config {
            annotations: AnnotationKeys::default(),
            defaults: EntryDefaults {
                environment: "prod".to_string(),
                ..Default::default()
            },
            kube: KubeConfig::default(),
            storage: StorageConfig::default(),
            run: RunConfig {
                scan_interval: -1,
                ..Default::default()
            },
            versions: VersionConfig::default(),
        };
        CommandContext::from_parts(config, Arc::new(client))
    }

    fn cluster() -> MockClusterClient {
        MockClusterClient::new()
            .with_namespace(NamespaceRecord::new("team-x"))
            .with_pod(
                "team-x",
                PodRecord {
                    name: "api-0".to_string(),
                    containers: vec![ContainerSpecInfo::new("api", "quay.io/api:1.2.3")],
                    ..Default::default()
                },
            )
            .with_workload(
                WorkloadRecord::new(WorkloadKind::Deployment, "api")
                    .with_metadata(Metadata::default().with_label("app.kubernetes.io/name", "api"))
                    .with_container(ContainerSpecInfo::new("api", "quay.io/api:1.2.3")),
            )
    }

    #[tokio::test]
    async fn test_run_once_writes_output_and_returns() {
        let ctx = context(cluster());
        let storage = MemoryStorage::new();

        run(&ctx, &storage).await.unwrap();

        assert!(storage.get("prod-output.json").is_some());
        assert!(storage.get("prod-service-description.json").is_some());
    }

    #[tokio::test]
    async fn test_versions_once_publishes_latest_result() {
        let ctx = context(cluster());
        let latest = LatestResult::default();

        version_loop(&ctx, &latest).await.unwrap();

        let result = latest.read().unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].name, "api");
    }

    #[tokio::test]
    async fn test_images_require_environment() {
        let mut ctx = context(cluster());
        ctx.config.defaults.environment.clear();
        let storage = MemoryStorage::new();

        let err = images(&ctx, &storage).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
