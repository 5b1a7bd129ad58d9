//! Route definitions for waitlist signups.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::signups;
use crate::state::AppState;

/// Routes mounted at `/signups`.
///
/// ```text
/// GET    /options     -> options
/// POST   /validate    -> validate
/// POST   /            -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(signups::create))
        .route("/options", get(signups::options))
        .route("/validate", post(signups::validate))
}
