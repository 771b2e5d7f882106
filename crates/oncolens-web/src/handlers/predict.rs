//! Single-record prediction page.

use std::collections::HashMap;

use axum::{extract::State, response::Response, Form};
use oncolens_common::feature_label;
use oncolens_common::prediction::bar_width;
use serde::Serialize;
use tracing::debug;

use crate::handlers::page;
use crate::state::SharedState;
use crate::view::{FeatureForm, FormSnapshot, LoadState};

#[derive(Serialize)]
struct FieldView {
    /// HTML id of the input; feature names may contain spaces.
    id: String,
    name: String,
    label: String,
    value: String,
    error: Option<&'static str>,
}

#[derive(Serialize)]
struct GroupView {
    title: &'static str,
    count: usize,
    fields: Vec<FieldView>,
}

#[derive(Serialize)]
struct ResultView {
    label: &'static str,
    css: &'static str,
    benign_pct: String,
    malignant_pct: String,
    benign_width: String,
    malignant_width: String,
}

#[derive(Serialize, Default)]
struct PredictPage {
    nav: &'static str,
    loading: bool,
    load_error: Option<String>,
    groups: Vec<GroupView>,
    result: Option<ResultView>,
    alert: Option<String>,
    invalid_count: usize,
    busy: bool,
}

fn field_id(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("f-{slug}")
}

fn build_page(snap: &FormSnapshot) -> PredictPage {
    let mut page = PredictPage { nav: "predict", busy: snap.busy, ..PredictPage::default() };

    match &snap.schema {
        LoadState::Loading => page.loading = true,
        LoadState::Error(msg) => page.load_error = Some(msg.clone()),
        LoadState::Ready(_) => {
            let categories = snap.categories().unwrap_or_default();
            page.groups = categories
                .groups()
                .map(|(category, names)| GroupView {
                    title: category.title(),
                    count: names.len(),
                    fields: names
                        .iter()
                        .map(|name| FieldView {
                            id: field_id(name),
                            name: name.clone(),
                            label: feature_label(name),
                            value: snap.values.get(name).cloned().unwrap_or_default(),
                            error: snap.error_for(name).map(|e| e.message()),
                        })
                        .collect(),
                })
                .collect();
        }
    }

    page.result = snap.result.as_ref().map(|r| {
        let diagnosis = r.diagnosis();
        ResultView {
            label: diagnosis.label(),
            css: diagnosis.css_class(),
            benign_pct: r.benign_percent(),
            malignant_pct: r.malignant_percent(),
            benign_width: format!("{:.2}", bar_width(r.probability_benign)),
            malignant_width: format!("{:.2}", bar_width(r.probability_malignant)),
        }
    });
    page.alert = snap.alert.clone();
    page.invalid_count = snap.field_errors.len();
    page
}

fn render(state: &SharedState, form: &FeatureForm) -> Response {
    page(state, "predict.html", build_page(&form.snapshot()))
}

/// GET /predict
pub async fn predict_page(State(state): State<SharedState>) -> Response {
    let form = state.feature_form();
    form.load_feature_schema().await;
    render(&state, &form)
}

/// POST /predict: one form field per feature name.
pub async fn predict_submit(
    State(state): State<SharedState>,
    Form(entries): Form<HashMap<String, String>>,
) -> Response {
    let form = state.feature_form();
    form.load_feature_schema().await;

    for (name, value) in entries {
        if !form.update_value(&name, value) {
            debug!(field = %name, "Ignoring field outside the feature schema");
        }
    }
    // Outcome is reflected in the snapshot: result, alert or field errors.
    let _ = form.submit().await;
    render(&state, &form)
}
