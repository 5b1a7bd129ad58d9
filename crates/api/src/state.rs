use std::sync::Arc;

use mg_db::repositories::{SignupSubmitter, SongCatalog};
use mg_db::RemoteStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Remote store handle, shared by the repositories below.
    pub store: Arc<dyn RemoteStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Waitlist signup pipeline.
    pub signups: SignupSubmitter,
    /// Song catalog repository.
    pub songs: SongCatalog,
}

impl AppState {
    /// Wire the repositories to one store handle.
    pub fn new(store: Arc<dyn RemoteStore>, config: ServerConfig) -> Self {
        Self {
            signups: SignupSubmitter::new(Arc::clone(&store)),
            songs: SongCatalog::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
        }
    }
}
