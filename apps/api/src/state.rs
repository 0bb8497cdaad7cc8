use std::sync::Arc;

use crate::analysis::orchestrator::AnalysisEngine;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// The engine is read-only after startup, so cloning the state per request is
/// just an `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub engine: Arc<AnalysisEngine>,
}
