//! Shared application state for the web server.

use std::sync::Arc;

use oncolens_client::{HttpPredictionApi, PredictionApi};
use oncolens_common::config::Config;
use oncolens_common::error::{OncoLensError, Result};

use crate::render::Templates;
use crate::view::{DashboardView, FeatureForm};

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub api: Arc<dyn PredictionApi>,
    pub config: Config,
    pub templates: Templates,
}

impl AppState {
    pub fn new(api: Arc<dyn PredictionApi>, config: Config) -> Result<Self> {
        Ok(Self { api, config, templates: Templates::new()? })
    }

    /// State backed by the HTTP client described in `config.backend`.
    pub fn from_config(config: Config) -> Result<Self> {
        let api = HttpPredictionApi::from_config(&config.backend)
            .map_err(|e| OncoLensError::Config(format!("Failed to build HTTP client: {e}")))?;
        Self::new(Arc::new(api), config)
    }

    pub fn feature_form(&self) -> FeatureForm {
        FeatureForm::new(self.api.clone())
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(
            self.api.clone(),
            self.config.backend.public_url(),
            self.config.backend.probe_images,
        )
    }
}

pub type SharedState = Arc<AppState>;
