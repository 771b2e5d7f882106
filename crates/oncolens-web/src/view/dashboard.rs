//! Model comparison dashboard.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use oncolens_client::PredictionApi;
use oncolens_common::metrics::{rank_by_roc_auc, ROC_CURVES_PATH};
use oncolens_common::ModelMetricRecord;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{lock, Lifetime, LoadState};

/// A chart produced by the training pipeline, which may or may not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartImage {
    pub title: String,
    /// Absolute URL the browser loads the image from.
    pub url: String,
    pub available: bool,
}

/// Metrics sorted best-first, with their charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMetrics {
    pub records: Vec<ModelMetricRecord>,
    pub roc_curves: ChartImage,
    /// One per record, same order.
    pub confusion_matrices: Vec<ChartImage>,
    pub fetched_at: DateTime<Utc>,
}

impl RankedMetrics {
    /// Best model by ROC-AUC.
    pub fn top_model(&self) -> Option<&ModelMetricRecord> {
        self.records.first()
    }
}

pub struct DashboardView {
    api: Arc<dyn PredictionApi>,
    /// Browser-facing base URL for backend static files.
    public_url: String,
    probe_images: bool,
    state: Mutex<LoadState<RankedMetrics>>,
    lifetime: Lifetime,
}

impl DashboardView {
    pub fn new(api: Arc<dyn PredictionApi>, public_url: impl Into<String>, probe_images: bool) -> Self {
        Self {
            api,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            probe_images,
            state: Mutex::new(LoadState::Loading),
            lifetime: Lifetime::new(),
        }
    }

    async fn chart(&self, title: String, path: &str) -> ChartImage {
        let available = if self.probe_images {
            self.api.asset_exists(path).await
        } else {
            true
        };
        if !available {
            debug!(path, "Chart image not available");
        }
        ChartImage { title, url: format!("{}{}", self.public_url, path), available }
    }

    /// Fetch and rank the metrics, replacing any previous list.
    pub async fn load_metrics(&self) {
        *lock(&self.state) = LoadState::Loading;

        let next = match self.api.model_metrics().await {
            Ok(mut records) => {
                rank_by_roc_auc(&mut records);
                let roc_curves = self.chart("ROC Curves".to_string(), ROC_CURVES_PATH).await;
                let mut confusion_matrices = Vec::with_capacity(records.len());
                for r in &records {
                    confusion_matrices.push(self.chart(r.model.clone(), &r.confusion_matrix_path()).await);
                }
                info!(models = records.len(), top = ?records.first().map(|r| &r.model), "Metrics loaded");
                LoadState::Ready(RankedMetrics {
                    records,
                    roc_curves,
                    confusion_matrices,
                    fetched_at: Utc::now(),
                })
            }
            Err(e) => {
                warn!(error = %e, "Could not load model metrics");
                LoadState::Error(format!("Failed to load metrics: {}", e.user_message()))
            }
        };

        if !self.lifetime.is_alive() {
            debug!("Metrics arrived after unmount, dropped");
            return;
        }
        *lock(&self.state) = next;
    }

    /// Re-run the fetch after a failure. Only acts from the `Error` state.
    pub async fn retry(&self) -> bool {
        let failed = lock(&self.state).error().is_some();
        if failed {
            self.load_metrics().await;
        }
        failed
    }

    pub fn top_model(&self) -> Option<ModelMetricRecord> {
        lock(&self.state).ready().and_then(|m| m.top_model().cloned())
    }

    pub fn snapshot(&self) -> LoadState<RankedMetrics> {
        lock(&self.state).clone()
    }

    pub fn unmount(&self) {
        self.lifetime.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncolens_client::mock::MockFailure;
    use oncolens_client::MockPredictionApi;
    use oncolens_common::ScoreTier;

    fn record(model: &str, roc_auc: f64) -> ModelMetricRecord {
        ModelMetricRecord {
            model: model.to_string(),
            roc_auc,
            f1: 0.93,
            accuracy: 0.94,
            cv_mean_roc_auc: 0.95,
            cv_std_roc_auc: 0.02,
        }
    }

    fn view(api: &Arc<MockPredictionApi>) -> DashboardView {
        DashboardView::new(api.clone(), "http://localhost:8000/", true)
    }

    #[tokio::test]
    async fn test_top_model_is_backend_first_when_sorted() {
        let first = record("Random Forest", 0.97);
        let api = Arc::new(MockPredictionApi::new().with_metrics(vec![first.clone(), record("SVM", 0.91)]));
        let dash = view(&api);
        dash.load_metrics().await;

        let top = dash.top_model().unwrap();
        assert_eq!(top, first);
        assert_eq!(ScoreTier::for_score(top.roc_auc), ScoreTier::Tier1);
    }

    #[tokio::test]
    async fn test_top_model_reranked_when_backend_unsorted() {
        let api = Arc::new(MockPredictionApi::new().with_metrics(vec![
            record("Logistic Regression", 0.93),
            record("Gradient Boosting", 0.99),
        ]));
        let dash = view(&api);
        dash.load_metrics().await;
        assert_eq!(dash.top_model().unwrap().model, "Gradient Boosting");
    }

    #[tokio::test]
    async fn test_chart_availability_and_urls() {
        let api = Arc::new(
            MockPredictionApi::new()
                .with_metrics(vec![record("Random Forest", 0.97), record("SVM", 0.9)])
                .with_asset("/static/roc_curves.png")
                .with_asset("/static/confusion_matrices/Random_Forest.png"),
        );
        let dash = view(&api);
        dash.load_metrics().await;

        let snap = dash.snapshot();
        let metrics = snap.ready().unwrap();
        assert!(metrics.roc_curves.available);
        assert_eq!(metrics.roc_curves.url, "http://localhost:8000/static/roc_curves.png");
        assert_eq!(
            metrics.confusion_matrices[0].url,
            "http://localhost:8000/static/confusion_matrices/Random_Forest.png"
        );
        assert!(metrics.confusion_matrices[0].available);
        assert!(!metrics.confusion_matrices[1].available);
    }

    #[tokio::test]
    async fn test_probe_disabled_assumes_available() {
        let api = Arc::new(MockPredictionApi::new().with_metrics(vec![record("SVM", 0.9)]));
        let dash = DashboardView::new(api.clone(), "http://localhost:8000", false);
        dash.load_metrics().await;
        assert!(dash.snapshot().ready().unwrap().confusion_matrices[0].available);
    }

    #[tokio::test]
    async fn test_error_then_retry() {
        let api = Arc::new(MockPredictionApi::new());
        api.set_metrics(Err(MockFailure::Status { status: 500, detail: Some("metrics.json missing".into()) }));
        let dash = view(&api);
        dash.load_metrics().await;
        assert_eq!(dash.snapshot().error(), Some("Failed to load metrics: metrics.json missing"));
        assert!(dash.top_model().is_none());

        api.set_metrics(Ok(vec![record("SVM", 0.9)]));
        assert!(dash.retry().await);
        assert!(dash.snapshot().error().is_none());
        assert_eq!(dash.top_model().unwrap().model, "SVM");
        assert_eq!(MockPredictionApi::calls(&api.metrics_calls), 2);
    }

    #[tokio::test]
    async fn test_reload_replaces_list_wholesale() {
        let api = Arc::new(MockPredictionApi::new().with_metrics(vec![record("A", 0.9), record("B", 0.8)]));
        let dash = view(&api);
        dash.load_metrics().await;
        api.set_metrics(Ok(vec![record("C", 0.7)]));
        dash.load_metrics().await;

        let snap = dash.snapshot();
        let models: Vec<_> = snap.ready().unwrap().records.iter().map(|r| r.model.clone()).collect();
        assert_eq!(models, vec!["C"]);
    }

    #[tokio::test]
    async fn test_unmount_discards_late_metrics() {
        let (mock, gate) = MockPredictionApi::new().with_metrics(vec![record("SVM", 0.9)]).gated();
        let api = Arc::new(mock);
        let dash = Arc::new(view(&api));

        let pending = tokio::spawn({
            let dash = dash.clone();
            async move { dash.load_metrics().await }
        });
        while MockPredictionApi::calls(&api.metrics_calls) == 0 {
            tokio::task::yield_now().await;
        }
        dash.unmount();
        gate.notify_one();
        pending.await.unwrap();

        assert!(dash.snapshot().is_loading());
    }
}
