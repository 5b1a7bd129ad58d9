use crate::types::DbId;

/// Domain failures raised by the song catalog.
///
/// Signup outcomes have their own taxonomy in
/// [`SignupError`](crate::signup::SignupError).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No row with `id` in the entity's collection.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before reaching the store.
    #[error("Validation failed: {0}")]
    Validation(String),
}
