//! Handlers for the `/signups` resource (waitlist).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mg_core::signup::{self, ExperienceLevel, SignupError, SignupInput};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Choices the signup form offers.
#[derive(Debug, Serialize)]
pub struct SignupOptions {
    pub genres: &'static [&'static str],
    pub experience_levels: Vec<&'static str>,
}

/// Result of running the validator without submitting.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/signups/options
pub async fn options() -> impl IntoResponse {
    Json(DataResponse {
        data: SignupOptions {
            genres: signup::GENRES,
            experience_levels: ExperienceLevel::ALL.iter().map(|l| l.as_str()).collect(),
        },
    })
}

/// POST /api/v1/signups/validate
///
/// Run every validation rule and report all problems at once. Nothing is
/// written.
pub async fn validate(Json(input): Json<SignupInput>) -> impl IntoResponse {
    let errors = signup::validate(&input);
    Json(DataResponse {
        data: ValidationReport {
            valid: errors.is_empty(),
            errors,
        },
    })
}

/// POST /api/v1/signups
///
/// Validate, then submit to the store. Returns the stored row(s).
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<SignupInput>,
) -> AppResult<impl IntoResponse> {
    let errors = signup::validate(&input);
    if !errors.is_empty() {
        return Err(SignupError::Validation(errors).into());
    }

    let records = state.signups.submit(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: records })))
}
