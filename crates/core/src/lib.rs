//! Domain logic for the Modern Guitar waitlist service.
//!
//! Everything in this crate is pure: validation, normalization and DTOs,
//! with no network or database access.

pub mod error;
pub mod signup;
pub mod song;
pub mod types;
