//! Single-record prediction form.
//!
//! Lifecycle: `load_feature_schema` fetches the expected feature names and
//! seeds an empty entry for each; `update_value` edits one entry; `submit`
//! validates every entry, posts the numeric vector and keeps the result.
//! At most one submission per form is in flight: a second `submit` while
//! the first is pending returns [`FormError::Busy`] without touching the
//! network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use oncolens_client::{ApiError, PredictionApi};
use oncolens_common::features::{categorize, coerce_values, CategorizedFeatures, FieldError};
use oncolens_common::PredictionResult;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{lock, Lifetime, LoadState};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("A prediction is already in progress")]
    Busy,

    #[error("Feature list has not been loaded")]
    NotReady,

    #[error("{} field(s) need a valid number", .0.len())]
    Invalid(Vec<FieldError>),

    #[error("Prediction failed: {}", .0.user_message())]
    Request(ApiError),

    /// The form was unmounted while the request was in flight.
    #[error("Form closed before the response arrived")]
    Discarded,
}

#[derive(Debug, Default)]
struct FormState {
    schema: LoadState<Vec<String>>,
    values: HashMap<String, String>,
    result: Option<PredictionResult>,
    field_errors: Vec<FieldError>,
    alert: Option<String>,
}

/// Read-only copy of the form for rendering.
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    pub schema: LoadState<Vec<String>>,
    pub values: HashMap<String, String>,
    pub result: Option<PredictionResult>,
    pub field_errors: Vec<FieldError>,
    /// Blocking notification to show the user.
    pub alert: Option<String>,
    pub busy: bool,
}

impl FormSnapshot {
    pub fn categories(&self) -> Option<CategorizedFeatures> {
        self.schema.ready().map(|names| categorize(names))
    }

    pub fn error_for(&self, feature: &str) -> Option<&FieldError> {
        self.field_errors.iter().find(|e| e.feature == feature)
    }
}

/// Clears the busy flag on every exit path of `submit`.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FeatureForm {
    api: Arc<dyn PredictionApi>,
    state: Mutex<FormState>,
    busy: AtomicBool,
    lifetime: Lifetime,
}

impl FeatureForm {
    pub fn new(api: Arc<dyn PredictionApi>) -> Self {
        Self {
            api,
            state: Mutex::new(FormState::default()),
            busy: AtomicBool::new(false),
            lifetime: Lifetime::new(),
        }
    }

    /// Fetch the feature names and reset every value to `""`.
    /// A failure leaves the form in `Error` until `retry`.
    pub async fn load_feature_schema(&self) {
        lock(&self.state).schema = LoadState::Loading;

        let outcome = self.api.features().await;
        if !self.lifetime.is_alive() {
            debug!("Feature schema arrived after unmount, dropped");
            return;
        }

        let mut state = lock(&self.state);
        match outcome {
            Ok(names) => {
                info!(count = names.len(), "Feature schema loaded");
                state.values = names.iter().map(|n| (n.clone(), String::new())).collect();
                state.schema = LoadState::Ready(names);
            }
            Err(e) => {
                warn!(error = %e, "Could not load feature schema");
                state.schema = LoadState::Error(format!("Could not load features: {}", e.user_message()));
            }
        }
    }

    /// Re-run the schema fetch. Only acts from the `Error` state.
    pub async fn retry(&self) -> bool {
        let failed = matches!(lock(&self.state).schema, LoadState::Error(_));
        if failed {
            self.load_feature_schema().await;
        }
        failed
    }

    /// Overwrite a single entry. Names outside the loaded schema are ignored.
    pub fn update_value(&self, name: &str, raw: impl Into<String>) -> bool {
        let mut state = lock(&self.state);
        match state.values.get_mut(name) {
            Some(slot) => {
                *slot = raw.into();
                true
            }
            None => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate and submit the current values.
    ///
    /// The previous result and alert are cleared first, so a failure never
    /// leaves a stale result on screen.
    pub async fn submit(&self) -> Result<PredictionResult, FormError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Submit ignored, request already in flight");
            return Err(FormError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        let payload = {
            let mut state = lock(&self.state);
            state.result = None;
            state.alert = None;
            state.field_errors.clear();

            let features = match &state.schema {
                LoadState::Ready(names) => names.clone(),
                _ => return Err(FormError::NotReady),
            };
            match coerce_values(&features, &state.values) {
                Ok(numeric) => numeric,
                Err(errors) => {
                    debug!(invalid = errors.len(), "Rejected form before submission");
                    state.field_errors = errors.clone();
                    return Err(FormError::Invalid(errors));
                }
            }
        };

        let outcome = self.api.predict(&payload).await;
        if !self.lifetime.is_alive() {
            debug!("Prediction arrived after unmount, dropped");
            return Err(FormError::Discarded);
        }

        let mut state = lock(&self.state);
        match outcome {
            Ok(result) => {
                info!(diagnosis = result.diagnosis().label(), "Prediction complete");
                state.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                let err = FormError::Request(e);
                warn!(error = %err, "Prediction request failed");
                state.alert = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = lock(&self.state);
        FormSnapshot {
            schema: state.schema.clone(),
            values: state.values.clone(),
            result: state.result.clone(),
            field_errors: state.field_errors.clone(),
            alert: state.alert.clone(),
            busy: self.is_busy(),
        }
    }

    /// End the form's lifetime; in-flight responses are discarded.
    pub fn unmount(&self) {
        self.lifetime.end();
    }
}
