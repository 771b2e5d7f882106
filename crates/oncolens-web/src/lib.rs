//! oncolens-web: Web GUI for the breast cancer classification service.
//! Provides:
//!   - Model performance dashboard (metrics table, bar charts, chart images)
//!   - Single-record prediction form
//!   - CSV batch prediction
//!   - JSON endpoints for metrics, features and backend health

pub mod handlers;
pub mod render;
pub mod router;
pub mod state;
pub mod view;
