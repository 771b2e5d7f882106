//! oncolens-client: Typed access to the breast cancer prediction API.
//!
//! The web views only talk to the backend through [`PredictionApi`], so they
//! can be driven by [`MockPredictionApi`] in tests.

pub mod error;
pub mod http;
pub mod mock;

use std::collections::BTreeMap;

use async_trait::async_trait;
use oncolens_common::{BatchPredictionResult, HealthStatus, ModelMetricRecord, PredictionResult};

pub use error::ApiError;
pub use http::HttpPredictionApi;
pub use mock::MockPredictionApi;

/// Calls the dashboard and prediction form make against the backend.
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Expected feature names, in model order.
    async fn features(&self) -> Result<Vec<String>, ApiError>;

    /// Classify one feature vector.
    async fn predict(&self, features: &BTreeMap<String, f64>) -> Result<PredictionResult, ApiError>;

    /// Classify every row of a CSV file.
    async fn predict_batch(&self, file_name: &str, csv: Vec<u8>) -> Result<BatchPredictionResult, ApiError>;

    /// Evaluation records for every trained model.
    async fn model_metrics(&self) -> Result<Vec<ModelMetricRecord>, ApiError>;

    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// Whether a static asset (chart image) is currently served.
    async fn asset_exists(&self, path: &str) -> bool;
}
