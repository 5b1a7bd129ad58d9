//! Request handlers.
//!
//! Handlers delegate to the repositories in `mg_db` held by [`AppState`]
//! and map errors via [`AppError`].
//!
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod signups;
pub mod songs;
