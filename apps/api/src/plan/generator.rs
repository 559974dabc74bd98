//! Plan generation — orchestrates one round trip to the model.
//!
//! Flow: validate profile → build prompt → model completion → parse + normalize →
//!       store in the latest-plan slot → return.
//!
//! A completion that cannot be normalized is still stored (as `{error, raw}`) so the
//! raw text can be inspected or re-normalized later.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::PlanModel;
use crate::models::plan::NormalizedPlan;
use crate::models::profile::UserProfile;
use crate::plan::normalize::normalize_completion;
use crate::plan::prompts::build_plan_prompt;
use crate::plan::store::{PlanStore, StoredPlan};

/// Error label stored alongside raw text that could not be normalized.
pub const PARSE_ERROR_LABEL: &str = "JSON parse error";

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub plan: NormalizedPlan,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Generates a plan for `profile`, stores it, and returns it.
pub async fn generate_plan(
    model: &dyn PlanModel,
    store: &PlanStore,
    profile: &UserProfile,
) -> Result<GeneratedPlan, AppError> {
    profile.validate().map_err(AppError::Validation)?;

    let prompt = build_plan_prompt(profile);
    info!("Requesting plan from {}", model.model_name());

    let raw = model
        .complete(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Plan generation failed: {e}")))?;

    match normalize_completion(&raw) {
        Ok(plan) => {
            info!(
                "Plan normalized: {} workout days, {} meals",
                plan.workout_plan.len(),
                plan.meals().len()
            );
            let stored = StoredPlan::parsed(plan.clone(), raw);
            let generated_at = stored.generated_at;
            store.save(stored).await?;
            Ok(GeneratedPlan { plan, generated_at })
        }
        Err(e) => {
            warn!("Model returned an unusable plan: {e}");
            store.save(StoredPlan::unparsed(PARSE_ERROR_LABEL, raw)).await?;
            Err(AppError::PlanParse(e))
        }
    }
}
