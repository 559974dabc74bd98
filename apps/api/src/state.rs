use std::sync::Arc;

use crate::llm_client::PlanModel;
use crate::plan::store::PlanStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `GeminiClient` in production, swapped for stubs in tests.
    pub model: Arc<dyn PlanModel>,
    /// The single latest-plan slot.
    pub store: Arc<PlanStore>,
}
