use std::sync::Arc;

use crate::pipeline::FitClassifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup and only read afterwards.
    pub classifier: Arc<dyn FitClassifier>,
}
