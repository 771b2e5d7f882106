//! Model evaluation records and the helpers the dashboard renders them with.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Path of the combined ROC chart on the backend's static mount.
pub const ROC_CURVES_PATH: &str = "/static/roc_curves.png";

/// Directory of per-model confusion matrices on the backend's static mount.
pub const CONFUSION_MATRIX_DIR: &str = "/static/confusion_matrices";

/// One trained model's aggregate evaluation scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetricRecord {
    pub model: String,
    pub roc_auc: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub cv_mean_roc_auc: f64,
    pub cv_std_roc_auc: f64,
}

impl ModelMetricRecord {
    /// Confusion matrix file name: spaces become underscores.
    pub fn confusion_matrix_file(&self) -> String {
        format!("{}.png", self.model.replace(' ', "_"))
    }

    pub fn confusion_matrix_path(&self) -> String {
        format!("{}/{}", CONFUSION_MATRIX_DIR, self.confusion_matrix_file())
    }
}

/// Visual emphasis bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl ScoreTier {
    pub fn for_score(value: f64) -> Self {
        if value >= 0.95 {
            ScoreTier::Tier1
        } else if value >= 0.90 {
            ScoreTier::Tier2
        } else if value >= 0.85 {
            ScoreTier::Tier3
        } else {
            ScoreTier::Tier4
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTier::Tier1 => "tier-1",
            ScoreTier::Tier2 => "tier-2",
            ScoreTier::Tier3 => "tier-3",
            ScoreTier::Tier4 => "tier-4",
        }
    }
}

/// Sort records best-first by ROC-AUC.
///
/// The sort is stable, so ties keep the backend order. NaN scores sort last.
pub fn rank_by_roc_auc(records: &mut [ModelMetricRecord]) {
    records.sort_by(|a, b| match (a.roc_auc.is_nan(), b.roc_auc.is_nan()) {
        (false, false) => b.roc_auc.partial_cmp(&a.roc_auc).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    });
}
