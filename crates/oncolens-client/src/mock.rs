//! In-memory `PredictionApi` with canned replies, for unit and router tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use oncolens_common::{BatchPredictionResult, HealthStatus, ModelMetricRecord, PredictionResult};
use tokio::sync::Notify;

use crate::{ApiError, PredictionApi};

/// Failure a mock endpoint reports.
#[derive(Debug, Clone)]
pub enum MockFailure {
    Status { status: u16, detail: Option<String> },
    Decode(String),
}

impl MockFailure {
    fn to_error(&self) -> ApiError {
        match self {
            MockFailure::Status { status, detail } => ApiError::Status { status: *status, detail: detail.clone() },
            MockFailure::Decode(msg) => ApiError::Decode(msg.clone()),
        }
    }
}

type Reply<T> = Mutex<Result<T, MockFailure>>;

fn reply<T: Clone>(slot: &Reply<T>) -> Result<T, ApiError> {
    slot.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .map_err(|f| f.to_error())
}

fn set<T>(slot: &Reply<T>, value: Result<T, MockFailure>) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

/// Mock backend. Every endpoint fails with 503 until configured.
pub struct MockPredictionApi {
    features: Reply<Vec<String>>,
    prediction: Reply<PredictionResult>,
    batch: Reply<BatchPredictionResult>,
    metrics: Reply<Vec<ModelMetricRecord>>,
    healthy: bool,
    assets: HashSet<String>,
    /// When set, `predict` and `model_metrics` wait for a permit before replying.
    gate: Option<Arc<Notify>>,
    last_predict: Mutex<Option<BTreeMap<String, f64>>>,
    pub feature_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub metrics_calls: AtomicUsize,
}

fn unavailable<T>() -> Reply<T> {
    Mutex::new(Err(MockFailure::Status { status: 503, detail: None }))
}

impl MockPredictionApi {
    pub fn new() -> Self {
        Self {
            features: unavailable(),
            prediction: unavailable(),
            batch: unavailable(),
            metrics: unavailable(),
            healthy: false,
            assets: HashSet::new(),
            gate: None,
            last_predict: Mutex::new(None),
            feature_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            metrics_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_features<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        self.set_features(Ok(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_prediction(self, prediction: u8, probability_benign: f64) -> Self {
        self.set_prediction(Ok(PredictionResult {
            prediction,
            probability_benign,
            probability_malignant: 1.0 - probability_benign,
        }));
        self
    }

    pub fn with_batch(self, results: Vec<PredictionResult>) -> Self {
        set(&self.batch, Ok(BatchPredictionResult { results }));
        self
    }

    pub fn with_metrics(self, records: Vec<ModelMetricRecord>) -> Self {
        self.set_metrics(Ok(records));
        self
    }

    pub fn with_asset(mut self, path: impl Into<String>) -> Self {
        self.assets.insert(path.into());
        self
    }

    pub fn healthy(mut self) -> Self {
        self.healthy = true;
        self
    }

    pub fn failing_predict(self, status: u16, detail: Option<&str>) -> Self {
        self.set_prediction(Err(MockFailure::Status { status, detail: detail.map(String::from) }));
        self
    }

    pub fn failing_batch(self, status: u16, detail: Option<&str>) -> Self {
        set(&self.batch, Err(MockFailure::Status { status, detail: detail.map(String::from) }));
        self
    }

    /// Hold `predict` and `model_metrics` until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn set_features(&self, value: Result<Vec<String>, MockFailure>) {
        set(&self.features, value);
    }

    pub fn set_prediction(&self, value: Result<PredictionResult, MockFailure>) {
        set(&self.prediction, value);
    }

    pub fn set_metrics(&self, value: Result<Vec<ModelMetricRecord>, MockFailure>) {
        set(&self.metrics, value);
    }

    /// Payload of the most recent `predict` call.
    pub fn last_predict(&self) -> Option<BTreeMap<String, f64>> {
        self.last_predict.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl Default for MockPredictionApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionApi for MockPredictionApi {
    async fn features(&self) -> Result<Vec<String>, ApiError> {
        self.feature_calls.fetch_add(1, Ordering::SeqCst);
        reply(&self.features)
    }

    async fn predict(&self, features: &BTreeMap<String, f64>) -> Result<PredictionResult, ApiError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_predict.lock().unwrap_or_else(PoisonError::into_inner) = Some(features.clone());
        self.wait_gate().await;
        reply(&self.prediction)
    }

    async fn predict_batch(&self, _file_name: &str, _csv: Vec<u8>) -> Result<BatchPredictionResult, ApiError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        reply(&self.batch)
    }

    async fn model_metrics(&self) -> Result<Vec<ModelMetricRecord>, ApiError> {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        reply(&self.metrics)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        if self.healthy {
            Ok(HealthStatus { status: "ok".to_string() })
        } else {
            Err(MockFailure::Status { status: 503, detail: None }.to_error())
        }
    }

    async fn asset_exists(&self, path: &str) -> bool {
        self.assets.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replies_and_counts() {
        let api = MockPredictionApi::new()
            .with_features(["mean_radius", "worst_area"])
            .with_prediction(1, 0.9)
            .with_asset("/static/roc_curves.png");

        assert_eq!(api.features().await.unwrap(), vec!["mean_radius", "worst_area"]);
        let mut payload = BTreeMap::new();
        payload.insert("mean_radius".to_string(), 12.0);
        let result = api.predict(&payload).await.unwrap();
        assert_eq!(result.prediction, 1);

        assert_eq!(MockPredictionApi::calls(&api.feature_calls), 1);
        assert_eq!(MockPredictionApi::calls(&api.predict_calls), 1);
        assert_eq!(api.last_predict(), Some(payload));
        assert!(api.asset_exists("/static/roc_curves.png").await);
        assert!(!api.asset_exists("/static/confusion_matrices/SVM.png").await);
    }

    #[tokio::test]
    async fn test_unconfigured_endpoints_fail() {
        let api = MockPredictionApi::new().failing_predict(400, Some("Missing feature: 'x'"));
        assert!(matches!(api.model_metrics().await, Err(ApiError::Status { status: 503, .. })));
        assert!(api.health().await.is_err());
        let err = api.predict(&BTreeMap::new()).await.unwrap_err();
        assert_eq!(err.user_message(), "Missing feature: 'x'");
    }
}
