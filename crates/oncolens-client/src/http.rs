//! reqwest-backed client for the FastAPI prediction service.
//!
//! Endpoints used:
//!   GET  /features         ordered feature names
//!   POST /predict          single-record classification
//!   POST /predict/batch    CSV upload, one result per row
//!   GET  /models/metrics   evaluation records
//!   GET  /health           liveness
//!   HEAD /static/...       chart image probes

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use oncolens_common::config::BackendConfig;
use oncolens_common::prediction::PredictRequest;
use oncolens_common::{BatchPredictionResult, HealthStatus, ModelMetricRecord, PredictionResult};
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{extract_detail, ApiError};
use crate::PredictionApi;

#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    client: Client,
    base_url: String,
}

impl HttpPredictionApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.client.get(self.url(path)).send().await?;
        decode(resp).await
    }
}

/// Map a response to `T`, turning non-2xx statuses into `ApiError::Status`.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(status = status.as_u16(), ?detail, "Backend returned an error");
        return Err(ApiError::Status { status: status.as_u16(), detail });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    #[instrument(skip(self))]
    async fn features(&self) -> Result<Vec<String>, ApiError> {
        let names: Vec<String> = self.get_json("/features").await?;
        debug!(count = names.len(), "Fetched feature schema");
        Ok(names)
    }

    #[instrument(skip(self, features), fields(n = features.len()))]
    async fn predict(&self, features: &BTreeMap<String, f64>) -> Result<PredictionResult, ApiError> {
        let body = PredictRequest { features: features.clone() };
        let resp = self.client.post(self.url("/predict")).json(&body).send().await?;
        let result: PredictionResult = decode(resp).await?;
        debug!(prediction = result.prediction, p_benign = result.probability_benign, "Prediction received");
        Ok(result)
    }

    #[instrument(skip(self, csv), fields(bytes = csv.len()))]
    async fn predict_batch(&self, file_name: &str, csv: Vec<u8>) -> Result<BatchPredictionResult, ApiError> {
        if csv.is_empty() {
            return Err(ApiError::Request(format!("{file_name} is empty")));
        }
        let part = multipart::Part::bytes(csv)
            .file_name(file_name.to_string())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);
        let resp = self.client.post(self.url("/predict/batch")).multipart(form).send().await?;
        let batch: BatchPredictionResult = decode(resp).await?;
        debug!(rows = batch.results.len(), "Batch prediction received");
        Ok(batch)
    }

    #[instrument(skip(self))]
    async fn model_metrics(&self) -> Result<Vec<ModelMetricRecord>, ApiError> {
        let records: Vec<ModelMetricRecord> = self.get_json("/models/metrics").await?;
        debug!(count = records.len(), "Fetched model metrics");
        Ok(records)
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health").await
    }

    async fn asset_exists(&self, path: &str) -> bool {
        match self.client.head(self.url(path)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(path, error = %e, "Asset probe failed");
                false
            }
        }
    }
}
