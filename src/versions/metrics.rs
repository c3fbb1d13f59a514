//! Prometheus metrics for collected versions
//!
//! Two gauge vectors, `version_current_app` and `version_current_helm`, carry
//! one sample per application and version component. They are refreshed from
//! the latest completed scan and served as text on `GET /metrics`.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::error::Result;
use crate::models::CollectionResult;
use crate::semantic::Version;

/// Source of the most recent version scan result
pub type ResultProvider = Arc<dyn Fn() -> CollectionResult + Send + Sync>;

const LABELS: [&str; 2] = ["app", "type"];
const COMPONENTS: [&str; 3] = ["major", "minor", "patch"];

/// Gauges exposing the current application and Helm chart versions
#[derive(Clone)]
pub struct VersionMetrics {
    registry: Registry,
    app: GaugeVec,
    helm: GaugeVec,
    published: Arc<Mutex<Published>>,
}

/// Application names currently carrying samples, per gauge
#[derive(Default)]
struct Published {
    app: BTreeSet<String>,
    helm: BTreeSet<String>,
}

impl VersionMetrics {
    pub fn new(cluster_name: &str, team: &str) -> Result<Self> {
        let opts = |name: &str, help: &str| {
            Opts::new(name, help)
                .const_label("cluster_name", cluster_name)
                .const_label("team", team)
        };

        let app = GaugeVec::new(
            opts("version_current_app", "Current application version"),
            &LABELS,
        )?;
        let helm = GaugeVec::new(
            opts("version_current_helm", "Current helm chart version"),
            &LABELS,
        )?;

        let registry = Registry::new();
        registry.register(Box::new(app.clone()))?;
        registry.register(Box::new(helm.clone()))?;

        Ok(Self {
            registry,
            app,
            helm,
            published: Arc::default(),
        })
    }

    /// Publish the versions in `result` and drop applications no longer in it.
    ///
    /// Samples of applications still present are overwritten in place.
    pub fn update(&self, result: &CollectionResult) {
        let mut published = match self.published.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut app = BTreeSet::new();
        let mut helm = BTreeSet::new();

        for entry in &result.entries {
            if let Some(version) = &entry.app_version {
                set_version(&self.app, &entry.name, version);
                app.insert(entry.name.clone());
            }
            if let Some(version) = &entry.helm_version {
                set_version(&self.helm, &entry.name, version);
                helm.insert(entry.name.clone());
            }
        }

        remove_vanished(&self.app, &published.app, &app);
        remove_vanished(&self.helm, &published.helm, &helm);
        *published = Published { app, helm };
    }

    /// Prometheus text exposition of all gauges
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn set_version(gauge: &GaugeVec, app: &str, version: &Version) {
    let values = [version.major, version.minor, version.patch];
    for (kind, value) in COMPONENTS.into_iter().zip(values) {
        gauge.with_label_values(&[app, kind]).set(value as f64);
    }
}

fn remove_vanished(gauge: &GaugeVec, before: &BTreeSet<String>, now: &BTreeSet<String>) {
    for app in before.difference(now) {
        for kind in COMPONENTS {
            if let Err(err) = gauge.remove_label_values(&[app.as_str(), kind]) {
                log::debug!("No {} sample for {}: {}", kind, app, err);
            }
        }
    }
}

/// Refresh the gauges from `provider` every `interval`, forever
pub async fn refresh_loop(metrics: VersionMetrics, provider: ResultProvider, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let result = provider();
        log::debug!("Updating metrics for {} applications", result.entries.len());
        metrics.update(&result);
    }
}

async fn metrics_handler(State(metrics): State<VersionMetrics>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            log::error!("Failed to encode metrics: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Router serving `GET /metrics`
pub fn router(metrics: VersionMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serve the metrics endpoint until the process exits
pub async fn serve(metrics: VersionMetrics, address: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    log::info!("Serving metrics on http://{}/metrics", address);
    axum::serve(listener, router(metrics)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApplicationEntry;

    fn result() -> CollectionResult {
        CollectionResult {
            entries: vec![ApplicationEntry {
                name: "api".to_string(),
                app_version: Some(Version::new(1, 4, 2)),
                helm_version: Some(Version::new(0, 3, 0)),
                is_managed_by_helm: true,
            }],
        }
    }

    #[test]
    fn test_update_sets_components() {
        let metrics = VersionMetrics::new("prod-eu", "fury").unwrap();
        metrics.update(&result());

        assert_eq!(metrics.app.with_label_values(&["api", "major"]).get(), 1.0);
        assert_eq!(metrics.app.with_label_values(&["api", "minor"]).get(), 4.0);
        assert_eq!(metrics.app.with_label_values(&["api", "patch"]).get(), 2.0);
        assert_eq!(metrics.helm.with_label_values(&["api", "minor"]).get(), 3.0);
    }

    #[test]
    fn test_render_includes_const_labels() {
        let metrics = VersionMetrics::new("prod-eu", "fury").unwrap();
        metrics.update(&result());

        let text = metrics.render().unwrap();
        assert!(text.contains("version_current_app{"));
        assert!(text.contains("cluster_name=\"prod-eu\""));
        assert!(text.contains("team=\"fury\""));
        assert!(text.contains("type=\"patch\""));
    }

    #[test]
    fn test_update_drops_vanished_apps() {
        let metrics = VersionMetrics::new("prod-eu", "fury").unwrap();
        metrics.update(&result());
        metrics.update(&CollectionResult::default());

        assert!(!metrics.render().unwrap().contains("app=\"api\""));
    }

    #[test]
    fn test_update_keeps_series_of_remaining_apps() {
        let metrics = VersionMetrics::new("prod-eu", "fury").unwrap();
        let mut both = result();
        both.entries.push(ApplicationEntry {
            name: "worker".to_string(),
            app_version: Some(Version::new(2, 0, 0)),
            helm_version: None,
            is_managed_by_helm: false,
        });
        metrics.update(&both);

        let mut next = result();
        next.entries[0].app_version = Some(Version::new(1, 5, 0));
        metrics.update(&next);

        let text = metrics.render().unwrap();
        assert!(!text.contains("app=\"worker\""));
        assert_eq!(metrics.app.with_label_values(&["api", "minor"]).get(), 5.0);
        assert_eq!(metrics.helm.with_label_values(&["api", "minor"]).get(), 3.0);
        assert_eq!(text.matches("app=\"api\"").count(), 6);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let metrics = VersionMetrics::new("prod-eu", "fury").unwrap();
        metrics.update(&result());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(metrics)).await.unwrap() });

        let body = reqwest::get(format!("http://{}/metrics", address))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("version_current_helm"));
    }
}
