//! CSV batch prediction page, forwarded to the backend's `/predict/batch`.

use axum::{
    extract::{Multipart, State},
    response::Response,
};
use oncolens_common::{BatchPredictionResult, Diagnosis};
use serde::Serialize;
use tracing::{info, warn};

use crate::handlers::page;
use crate::state::SharedState;

#[derive(Serialize)]
struct BatchRow {
    index: usize,
    label: &'static str,
    css: &'static str,
    benign_pct: String,
    malignant_pct: String,
}

#[derive(Serialize, Default)]
struct BatchPage {
    nav: &'static str,
    error: Option<String>,
    file_name: Option<String>,
    rows: Vec<BatchRow>,
    benign_count: usize,
    malignant_count: usize,
}

impl BatchPage {
    fn empty() -> Self {
        Self { nav: "batch", ..Self::default() }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Self::empty() }
    }

    fn from_results(file_name: String, batch: BatchPredictionResult) -> Self {
        let mut page = Self { file_name: Some(file_name), ..Self::empty() };
        for (i, r) in batch.results.iter().enumerate() {
            let diagnosis = r.diagnosis();
            match diagnosis {
                Diagnosis::Benign => page.benign_count += 1,
                Diagnosis::Malignant => page.malignant_count += 1,
            }
            page.rows.push(BatchRow {
                index: i + 1,
                label: diagnosis.label(),
                css: diagnosis.css_class(),
                benign_pct: r.benign_percent(),
                malignant_pct: r.malignant_percent(),
            });
        }
        page
    }
}

/// GET /predict/batch
pub async fn batch_page(State(state): State<SharedState>) -> Response {
    page(&state, "batch.html", BatchPage::empty())
}

/// Pull the `file` part out of the upload.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Upload failed: {e}"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.csv").to_string();
        let bytes = field.bytes().await.map_err(|e| format!("Upload failed: {e}"))?;
        if bytes.is_empty() {
            return Err("The uploaded file is empty".to_string());
        }
        return Ok((file_name, bytes.to_vec()));
    }
    Err("Choose a CSV file to upload".to_string())
}

/// POST /predict/batch
pub async fn batch_submit(State(state): State<SharedState>, mut multipart: Multipart) -> Response {
    let (file_name, csv) = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(msg) => return page(&state, "batch.html", BatchPage::failed(msg)),
    };

    let result = match state.api.predict_batch(&file_name, csv).await {
        Ok(batch) => {
            info!(file = %file_name, rows = batch.results.len(), "Batch prediction complete");
            BatchPage::from_results(file_name, batch)
        }
        Err(e) => {
            warn!(file = %file_name, error = %e, "Batch prediction failed");
            BatchPage::failed(format!("Batch prediction failed: {}", e.user_message()))
        }
    };
    page(&state, "batch.html", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncolens_common::PredictionResult;

    #[test]
    fn test_from_results_counts() {
        let batch = BatchPredictionResult {
            results: vec![
                PredictionResult { prediction: 1, probability_benign: 0.9, probability_malignant: 0.1 },
                PredictionResult { prediction: 0, probability_benign: 0.2, probability_malignant: 0.8 },
                PredictionResult { prediction: 1, probability_benign: 0.75, probability_malignant: 0.25 },
            ],
        };
        let page = BatchPage::from_results("samples.csv".into(), batch);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.benign_count, 2);
        assert_eq!(page.malignant_count, 1);
        assert_eq!(page.rows[1].label, "Malignant");
        assert_eq!(page.rows[2].benign_pct, "75.00%");
        assert_eq!(page.rows[2].index, 3);
    }
}
