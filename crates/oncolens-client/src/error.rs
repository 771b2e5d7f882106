//! Errors returned by the prediction API client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, timeout, or an unreadable response body.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        /// FastAPI `detail` field, if the body carried one.
        detail: Option<String>,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

impl ApiError {
    /// Message shown to the user: the backend's detail if present, else the
    /// transport-level message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail: Some(detail), .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Pull `detail` out of a FastAPI error body.
///
/// `HTTPException` bodies carry a string; request validation failures carry
/// a list of objects, which is passed through as compact JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
