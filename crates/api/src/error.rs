use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mg_core::error::CoreError;
use mg_core::signup::SignupError;
use mg_db::error_codes::ConstraintKind;
use mg_db::repositories::CatalogError;
use mg_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain, signup and store errors.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mg_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A classified signup failure.
    #[error(transparent)]
    Signup(#[from] SignupError),

    /// A remote store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Invalid(core) => Self::Core(core),
            CatalogError::Store(store) => Self::Store(store),
        }
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Signup outcomes (messages are meant for the user) ---
            AppError::Signup(signup) => classify_signup_error(signup),

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),
        };

        let body = match &self {
            AppError::Signup(SignupError::Validation(errors)) => json!({
                "error": message,
                "code": code,
                "errors": errors,
            }),
            _ => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn classify_signup_error(err: &SignupError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        SignupError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        SignupError::DuplicateEmail => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
        SignupError::MissingRequiredField => (StatusCode::BAD_REQUEST, "MISSING_REQUIRED_FIELD"),
        SignupError::PersistenceFailure(_) => (StatusCode::BAD_GATEWAY, "PERSISTENCE_FAILURE"),
    };
    (status, code, err.to_string())
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Transport failures map to 503.
/// - Unique violations map to 409.
/// - Not-null, check and foreign-key violations map to 400.
/// - Everything else maps to 502 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Transport(e) => {
            tracing::error!(error = %e, "Store unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The data store is unavailable".to_string(),
            )
        }
        StoreError::Api { message, .. } => match err.constraint_kind() {
            ConstraintKind::UniqueViolation => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value: {message}"),
            ),
            ConstraintKind::NotNullViolation
            | ConstraintKind::CheckViolation
            | ConstraintKind::ForeignKeyViolation => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            ConstraintKind::UndefinedTable | ConstraintKind::Other => {
                tracing::error!(code = err.code().unwrap_or("-"), error = %message, "Store rejected request");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORE_ERROR",
                    "The data store rejected the request".to_string(),
                )
            }
        },
        StoreError::Decode(msg) => {
            tracing::error!(error = %msg, "Unreadable store response");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_ERROR",
                "The data store rejected the request".to_string(),
            )
        }
    }
}
