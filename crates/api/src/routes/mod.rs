pub mod health;
pub mod signups;
pub mod songs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /signups/options                                 form choices (GET)
/// /signups/validate                                validate only (POST)
/// /signups                                         validate + submit (POST)
///
/// /songs                                           list, create
/// /songs/{id}                                      get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/signups", signups::router())
        .nest("/songs", songs::router())
}
