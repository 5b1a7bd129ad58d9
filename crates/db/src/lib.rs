//! Remote store access for the Modern Guitar waitlist service.
//!
//! The hosted backend is an opaque collaborator reached through
//! [`RemoteStore`]. [`connect`] builds the configured implementation once at
//! startup; the handle is then injected into the repositories.

use std::sync::Arc;

pub mod config;
pub mod error_codes;
pub mod memory;
pub mod migrate;
pub mod repositories;
pub mod rest;
pub mod store;

pub use config::{StoreBackend, StoreConfig};
pub use memory::MemoryStore;
pub use rest::RestStore;
pub use store::{Filter, Order, RemoteStore, StoreError};

/// Build the store client selected by `config`.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn RemoteStore>, StoreError> {
    match config.backend {
        StoreBackend::Rest => {
            tracing::info!(url = %config.url, schema = %config.schema, "Using hosted REST store");
            Ok(Arc::new(RestStore::new(config)?))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Ok(Arc::new(MemoryStore::with_default_schema()))
        }
    }
}
