//! Prediction request/response types for the classification backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: BTreeMap<String, f64>,
}

/// Classifier output for a single feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 1 = benign, 0 = malignant (sklearn breast cancer target encoding)
    pub prediction: u8,
    pub probability_benign: f64,
    pub probability_malignant: f64,
}

impl PredictionResult {
    pub fn diagnosis(&self) -> Diagnosis {
        if self.prediction == 1 {
            Diagnosis::Benign
        } else {
            Diagnosis::Malignant
        }
    }

    pub fn benign_percent(&self) -> String {
        format_percent(self.probability_benign)
    }

    pub fn malignant_percent(&self) -> String {
        format_percent(self.probability_malignant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl Diagnosis {
    pub fn label(self) -> &'static str {
        match self {
            Diagnosis::Benign => "Benign",
            Diagnosis::Malignant => "Malignant",
        }
    }

    /// CSS modifier for the result badge.
    pub fn css_class(self) -> &'static str {
        match self {
            Diagnosis::Benign => "success",
            Diagnosis::Malignant => "danger",
        }
    }
}

/// Response of `POST /predict/batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictionResult {
    pub results: Vec<PredictionResult>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// `0.87` → `"87.00%"`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Bar width in percent, clamped to `[0, 100]`.
pub fn bar_width(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    (probability * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_result_rendering() {
        let r: PredictionResult = serde_json::from_str(
            r#"{"prediction":1,"probability_benign":0.87,"probability_malignant":0.13}"#,
        )
        .unwrap();
        assert_eq!(r.diagnosis(), Diagnosis::Benign);
        assert_eq!(r.diagnosis().label(), "Benign");
        assert_eq!(r.benign_percent(), "87.00%");
        assert_eq!(r.malignant_percent(), "13.00%");
    }

    #[test]
    fn test_malignant_label() {
        let r = PredictionResult {
            prediction: 0,
            probability_benign: 0.02,
            probability_malignant: 0.98,
        };
        assert_eq!(r.diagnosis().label(), "Malignant");
        assert_eq!(r.diagnosis().css_class(), "danger");
    }

    #[test]
    fn test_format_percent_rounding() {
        assert_eq!(format_percent(0.12346), "12.35%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_bar_width_clamped() {
        assert_eq!(bar_width(1.2), 100.0);
        assert_eq!(bar_width(-0.1), 0.0);
        assert_eq!(bar_width(f64::NAN), 0.0);
    }

    #[test]
    fn test_predict_request_shape() {
        let mut features = BTreeMap::new();
        features.insert("mean_radius".to_string(), 14.2);
        let body = serde_json::to_value(PredictRequest { features }).unwrap();
        assert_eq!(body, serde_json::json!({"features": {"mean_radius": 14.2}}));
    }
}
