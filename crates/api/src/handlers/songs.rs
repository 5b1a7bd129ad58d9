//! Handlers for the `/songs` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mg_core::error::CoreError;
use mg_core::song::{CreateSong, UpdateSong};
use mg_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Song", id })
}

/// GET /api/v1/songs
///
/// List all songs, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let songs = state.songs.list().await?;
    Ok(Json(DataResponse { data: songs }))
}

/// POST /api/v1/songs
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSong>,
) -> AppResult<impl IntoResponse> {
    let song = state.songs.create(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: song })))
}

/// GET /api/v1/songs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let song = state.songs.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: song }))
}

/// PUT /api/v1/songs/{id}
///
/// Update the fields present in the body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSong>,
) -> AppResult<impl IntoResponse> {
    let song = state
        .songs
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: song }))
}

/// DELETE /api/v1/songs/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.songs.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
