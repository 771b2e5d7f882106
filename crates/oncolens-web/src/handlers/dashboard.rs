//! Dashboard handler: landing page comparing the trained models.

use axum::{extract::State, response::Response};
use oncolens_common::prediction::{bar_width, format_percent};
use oncolens_common::{ModelMetricRecord, ScoreTier};
use serde::Serialize;

use crate::handlers::page;
use crate::state::SharedState;
use crate::view::{ChartImage, LoadState, RankedMetrics};

#[derive(Serialize)]
struct ScoreCell {
    label: String,
    tier: &'static str,
}

impl ScoreCell {
    fn new(value: f64) -> Self {
        Self { label: format_percent(value), tier: ScoreTier::for_score(value).css_class() }
    }
}

#[derive(Serialize)]
struct MetricRow {
    rank: usize,
    model: String,
    roc_auc: ScoreCell,
    f1: ScoreCell,
    accuracy: ScoreCell,
    cv: String,
}

#[derive(Serialize)]
struct TopModel {
    model: String,
    roc_auc: String,
    f1: String,
    accuracy: String,
}

#[derive(Serialize)]
struct Bar {
    model: String,
    label: String,
    width: String,
    tier: &'static str,
}

#[derive(Serialize)]
struct BarChart {
    title: &'static str,
    bars: Vec<Bar>,
}

#[derive(Serialize, Default)]
struct DashboardPage {
    nav: &'static str,
    loading: bool,
    error: Option<String>,
    fetched_at: Option<String>,
    top: Option<TopModel>,
    rows: Vec<MetricRow>,
    bar_charts: Vec<BarChart>,
    roc_curves: Option<ChartImage>,
    confusion_matrices: Vec<ChartImage>,
}

fn bar_chart(title: &'static str, records: &[ModelMetricRecord], metric: fn(&ModelMetricRecord) -> f64) -> BarChart {
    BarChart {
        title,
        bars: records
            .iter()
            .map(|r| {
                let v = metric(r);
                Bar {
                    model: r.model.clone(),
                    label: format_percent(v),
                    width: format!("{:.2}", bar_width(v)),
                    tier: ScoreTier::for_score(v).css_class(),
                }
            })
            .collect(),
    }
}

fn build_page(state: LoadState<RankedMetrics>) -> DashboardPage {
    let mut page = DashboardPage { nav: "dashboard", ..DashboardPage::default() };
    match state {
        LoadState::Loading => page.loading = true,
        LoadState::Error(msg) => page.error = Some(msg),
        LoadState::Ready(metrics) => {
            page.top = metrics.top_model().map(|t| TopModel {
                model: t.model.clone(),
                roc_auc: format_percent(t.roc_auc),
                f1: format_percent(t.f1),
                accuracy: format_percent(t.accuracy),
            });
            page.rows = metrics
                .records
                .iter()
                .enumerate()
                .map(|(i, r)| MetricRow {
                    rank: i + 1,
                    model: r.model.clone(),
                    roc_auc: ScoreCell::new(r.roc_auc),
                    f1: ScoreCell::new(r.f1),
                    accuracy: ScoreCell::new(r.accuracy),
                    cv: format!("{:.4} ± {:.4}", r.cv_mean_roc_auc, r.cv_std_roc_auc),
                })
                .collect();
            page.bar_charts = vec![
                bar_chart("ROC-AUC Score", &metrics.records, |r| r.roc_auc),
                bar_chart("F1 Score", &metrics.records, |r| r.f1),
                bar_chart("Accuracy", &metrics.records, |r| r.accuracy),
            ];
            page.fetched_at = Some(metrics.fetched_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
            page.roc_curves = Some(metrics.roc_curves);
            page.confusion_matrices = metrics.confusion_matrices;
        }
    }
    page
}

/// GET / and GET /dashboard
pub async fn dashboard(State(state): State<SharedState>) -> Response {
    let view = state.dashboard();
    view.load_metrics().await;
    page(&state, "dashboard.html", build_page(view.snapshot()))
}

/// POST /dashboard/retry: explicit retry from the error panel.
pub async fn dashboard_retry(State(state): State<SharedState>) -> Response {
    dashboard(State(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(model: &str, roc_auc: f64) -> ModelMetricRecord {
        ModelMetricRecord {
            model: model.into(),
            roc_auc,
            f1: 0.88,
            accuracy: 0.8,
            cv_mean_roc_auc: 0.9812,
            cv_std_roc_auc: 0.012,
        }
    }

    fn chart(title: &str) -> ChartImage {
        ChartImage { title: title.into(), url: format!("http://x/{title}.png"), available: false }
    }

    #[test]
    fn test_build_page_ready() {
        let metrics = RankedMetrics {
            records: vec![record("Random Forest", 0.97), record("SVM", 0.9)],
            roc_curves: chart("roc"),
            confusion_matrices: vec![chart("Random Forest"), chart("SVM")],
            fetched_at: Utc::now(),
        };
        let page = build_page(LoadState::Ready(metrics));

        let top = page.top.unwrap();
        assert_eq!(top.model, "Random Forest");
        assert_eq!(top.roc_auc, "97.00%");
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].roc_auc.tier, "tier-1");
        assert_eq!(page.rows[1].roc_auc.tier, "tier-2");
        assert_eq!(page.rows[0].accuracy.tier, "tier-4");
        assert_eq!(page.rows[0].cv, "0.9812 ± 0.0120");
        assert_eq!(page.bar_charts.len(), 3);
        assert_eq!(page.bar_charts[1].bars[0].tier, "tier-3");
        assert_eq!(page.bar_charts[0].bars[0].width, "97.00");
        assert!(page.error.is_none());
    }

    #[test]
    fn test_build_page_error() {
        let page = build_page(LoadState::Error("Failed to load metrics: boom".into()));
        assert_eq!(page.error.as_deref(), Some("Failed to load metrics: boom"));
        assert!(page.rows.is_empty());
        assert!(page.top.is_none());
    }
}
