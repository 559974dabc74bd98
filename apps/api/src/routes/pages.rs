//! HTML pages: landing page, intake form, form submission, plan view.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::errors::AppError;
use crate::models::profile::UserProfile;
use crate::plan::generator::generate_plan;
use crate::plan::handlers::load_latest_plan;
use crate::plan::normalize::PlanParseError;
use crate::render::{
    render_error_page, render_intake_form, render_landing_page, render_plan_page, NO_PLAN_DATA,
    NO_SAVED_PLAN, PARSE_FAILED,
};
use crate::state::AppState;

/// GET /
pub async fn index() -> Html<String> {
    Html(render_landing_page())
}

/// GET /start
pub async fn intake_form() -> Html<String> {
    Html(render_intake_form())
}

/// POST /plan
///
/// Generates from the submitted form and redirects to the plan view.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(profile): Form<UserProfile>,
) -> Response {
    match generate_plan(state.model.as_ref(), &state.store, &profile).await {
        Ok(_) => Redirect::to("/plan").into_response(),
        Err(e) => error_page(e),
    }
}

/// GET /plan
pub async fn show_plan(State(state): State<AppState>) -> Response {
    match load_latest_plan(&state.store).await {
        Ok(plan) => Html(render_plan_page(&plan)).into_response(),
        Err(e) => error_page(e),
    }
}

fn error_page(err: AppError) -> Response {
    let status = err.status();
    let message = match &err {
        AppError::NotFound(_) => NO_SAVED_PLAN.to_string(),
        AppError::PlanParse(PlanParseError::NoPlanData) => NO_PLAN_DATA.to_string(),
        AppError::PlanParse(_) => PARSE_FAILED.to_string(),
        _ => err.public_message(),
    };
    (status, Html(render_error_page(&message))).into_response()
}
