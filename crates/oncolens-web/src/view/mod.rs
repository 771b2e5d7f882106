//! View-models behind the two pages.
//!
//! Each component owns its state behind a mutex that is never held across
//! an await, plus a [`Lifetime`] token. Once the token is ended, responses
//! that arrive late are dropped instead of written into the state.

pub mod dashboard;
pub mod feature_form;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

pub use dashboard::{ChartImage, DashboardView, RankedMetrics};
pub use feature_form::{FeatureForm, FormError, FormSnapshot};

/// `Loading → {Ready, Error}`, `Error → Loading` on retry, `Ready → Loading` on refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

/// Liveness token shared by a component and its in-flight requests.
#[derive(Debug, Clone)]
pub struct Lifetime(Arc<AtomicBool>);

impl Lifetime {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_shared_between_clones() {
        let a = Lifetime::new();
        let b = a.clone();
        assert!(b.is_alive());
        a.end();
        assert!(!b.is_alive());
    }

    #[test]
    fn test_load_state_accessors() {
        let s: LoadState<u32> = LoadState::Ready(3);
        assert_eq!(s.ready(), Some(&3));
        assert!(s.error().is_none());
        let e: LoadState<u32> = LoadState::Error("boom".into());
        assert_eq!(e.error(), Some("boom"));
        assert!(LoadState::<u32>::Loading.is_loading());
    }
}
