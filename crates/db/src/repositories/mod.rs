pub mod signup_submitter;
pub mod song_catalog;

pub use signup_submitter::{SignupSubmitter, SIGNUP_COLLECTION};
pub use song_catalog::{CatalogError, SongCatalog, SONG_COLLECTION};
