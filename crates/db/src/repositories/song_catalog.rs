//! Repository for the `songs` collection.

use std::sync::Arc;

use mg_core::error::CoreError;
use mg_core::song::{self, CreateSong, Song, UpdateSong};
use mg_core::types::DbId;
use serde_json::Value;

use crate::store::{Filter, Order, RemoteStore, StoreError};

/// Collection holding the song catalog.
pub const SONG_COLLECTION: &str = "songs";

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// CRUD over the song catalog. One store round trip per call, no caching.
#[derive(Clone)]
pub struct SongCatalog {
    store: Arc<dyn RemoteStore>,
}

impl SongCatalog {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// List all songs, newest first.
    pub async fn list(&self) -> Result<Vec<Song>, CatalogError> {
        let rows = self
            .store
            .select(SONG_COLLECTION, &[], Some(&Order::desc("created_at")))
            .await?;
        tracing::debug!(count = rows.len(), "Fetched songs");
        decode_all(rows)
    }

    /// Find a song by its ID.
    pub async fn find_by_id(&self, id: DbId) -> Result<Option<Song>, CatalogError> {
        let rows = self
            .store
            .select(SONG_COLLECTION, &[Filter::eq("id", id)], None)
            .await?;
        Ok(decode_all(rows)?.into_iter().next())
    }

    /// Validate and insert a new song, returning the stored row.
    pub async fn create(&self, input: &CreateSong) -> Result<Song, CatalogError> {
        song::validate_create(input)?;

        let record = serde_json::to_value(input).map_err(StoreError::from)?;
        let rows = self.store.insert(SONG_COLLECTION, record).await?;
        let created = decode_all(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))?;

        tracing::info!(song_id = created.id, title = %created.title, "Song added");
        Ok(created)
    }

    /// Apply the present fields of `input`.
    ///
    /// Returns `None` if no song with the given `id` exists.
    pub async fn update(&self, id: DbId, input: &UpdateSong) -> Result<Option<Song>, CatalogError> {
        song::validate_update(input)?;

        if input.is_empty() {
            return self.find_by_id(id).await;
        }

        let patch = serde_json::to_value(input).map_err(StoreError::from)?;
        let rows = self
            .store
            .update(SONG_COLLECTION, &[Filter::eq("id", id)], patch)
            .await?;
        let updated = decode_all(rows)?.into_iter().next();

        if updated.is_some() {
            tracing::info!(song_id = id, "Song updated");
        }
        Ok(updated)
    }

    /// Delete a song. Returns `true` if a row was removed.
    pub async fn delete(&self, id: DbId) -> Result<bool, CatalogError> {
        let removed = self
            .store
            .delete(SONG_COLLECTION, &[Filter::eq("id", id)])
            .await?;
        if !removed.is_empty() {
            tracing::info!(song_id = id, "Song deleted");
        }
        Ok(!removed.is_empty())
    }
}

fn decode_all(rows: Vec<Value>) -> Result<Vec<Song>, CatalogError> {
    rows.into_iter()
        .map(|row| serde_json::from_value::<Song>(row).map_err(|e| StoreError::from(e).into()))
        .collect()
}
