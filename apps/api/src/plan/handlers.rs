//! Axum route handlers for the Plan API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::models::plan::NormalizedPlan;
use crate::models::profile::UserProfile;
use crate::plan::export::download_plan;
use crate::plan::generator::{generate_plan, GeneratedPlan};
use crate::plan::normalize::{normalize_completion, PlanParseError};
use crate::plan::speech::SpeechScript;
use crate::plan::store::{PlanStore, StoredPlan};
use crate::render::NO_SAVED_PLAN;
use crate::state::AppState;

/// Normalized plan from the latest slot.
///
/// A slot holding only raw text (a failed parse) is normalized again, so plans that
/// the current normalizer understands become readable without regenerating them.
pub async fn load_latest_plan(store: &PlanStore) -> Result<NormalizedPlan, AppError> {
    let stored = store
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound(NO_SAVED_PLAN.to_string()))?;

    match (stored.plan, stored.raw) {
        (Some(plan), _) => Ok(plan),
        (None, Some(raw)) => Ok(normalize_completion(&raw)?),
        (None, None) => Err(AppError::PlanParse(PlanParseError::NoPlanData)),
    }
}

/// POST /api/generate-plan
///
/// Profile fields sit at the root of the JSON body.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<GeneratedPlan>, AppError> {
    let generated = generate_plan(state.model.as_ref(), &state.store, &profile).await?;
    Ok(Json(generated))
}

/// POST /api/plan/normalize
///
/// Normalizes a completion supplied by the caller: plain JSON, fenced JSON, or JSON
/// surrounded by prose. Nothing is stored.
pub async fn handle_normalize(body: String) -> Result<Json<NormalizedPlan>, AppError> {
    Ok(Json(normalize_completion(&body)?))
}

/// GET /api/plan/latest
pub async fn handle_latest(State(state): State<AppState>) -> Result<Json<StoredPlan>, AppError> {
    state
        .store
        .latest()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NO_SAVED_PLAN.to_string()))
}

/// GET /api/plan/latest/speech
pub async fn handle_latest_speech(
    State(state): State<AppState>,
) -> Result<Json<SpeechScript>, AppError> {
    let plan = load_latest_plan(&state.store).await?;
    Ok(Json(SpeechScript::for_plan(&plan)))
}

/// GET /api/plan/latest/download
pub async fn handle_latest_download(State(state): State<AppState>) -> Result<Response, AppError> {
    let plan = load_latest_plan(&state.store).await?;
    let download = download_plan(&plan).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, download.content_type.to_string()),
            (header::CONTENT_DISPOSITION, download.disposition()),
        ],
        download.body,
    )
        .into_response())
}
