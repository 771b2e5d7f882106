//! oncolens-common: Shared types, errors, and configuration used across all OncoLens crates.

pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod prediction;

// Re-export commonly used types
pub use config::Config;
pub use error::{OncoLensError, Result};
pub use features::{categorize, feature_label, CategorizedFeatures, FeatureCategory, FieldError};
pub use metrics::{ModelMetricRecord, ScoreTier};
pub use prediction::{BatchPredictionResult, Diagnosis, HealthStatus, PredictionResult};
