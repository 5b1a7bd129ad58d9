//! Waitlist signup persistence.
//!
//! [`SignupSubmitter`] re-checks the required fields, normalizes the input,
//! makes exactly one insert into `beta_signups`, and turns whatever the
//! store says into a [`SignupError`]. It never retries.
//!
//! Store `details` are never logged here: for constraint violations they
//! repeat the offending row values, email included.

use std::sync::Arc;

use mg_core::signup::{self, SignupError, SignupInput};
use serde_json::Value;

use crate::error_codes::ConstraintKind;
use crate::store::{RemoteStore, StoreError};

/// Collection holding waitlist signups.
pub const SIGNUP_COLLECTION: &str = "beta_signups";

/// Sends validated signups to the remote store.
#[derive(Clone)]
pub struct SignupSubmitter {
    store: Arc<dyn RemoteStore>,
}

impl SignupSubmitter {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Persist one signup.
    ///
    /// Returns the rows the store echoed back, unchanged and possibly
    /// empty; once the insert succeeds the call succeeds. Name and email
    /// are re-validated here because callers may skip the full validator;
    /// a failure returns [`SignupError::Validation`] without any network
    /// call.
    pub async fn submit(&self, input: &SignupInput) -> Result<Vec<Value>, SignupError> {
        let problems = signup::validate_required(input);
        if !problems.is_empty() {
            tracing::debug!(count = problems.len(), "Signup rejected before submission");
            return Err(SignupError::Validation(problems));
        }

        let row = signup::normalize(input, chrono::Utc::now());
        let record = serde_json::to_value(&row).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode signup row");
            SignupError::unexpected()
        })?;

        tracing::debug!(
            genres = row.genres.len(),
            experience_level = %row.experience_level,
            "Submitting signup"
        );

        let rows = self
            .store
            .insert(SIGNUP_COLLECTION, record)
            .await
            .map_err(classify_failure)?;

        tracing::info!(
            rows = rows.len(),
            signup_id = ?rows.first().and_then(|r| r.get("id")),
            "Signup recorded"
        );
        Ok(rows)
    }
}

/// Map a store failure onto the signup error taxonomy.
fn classify_failure(err: StoreError) -> SignupError {
    match err {
        StoreError::Api {
            status,
            ref code,
            ref message,
            ref hint,
            ..
        } => {
            let kind = err.constraint_kind();
            tracing::warn!(
                status,
                code = code.as_deref().unwrap_or("-"),
                hint = hint.as_deref().unwrap_or("-"),
                ?kind,
                "Signup insert rejected by store"
            );
            match kind {
                ConstraintKind::UniqueViolation => SignupError::DuplicateEmail,
                ConstraintKind::NotNullViolation => SignupError::MissingRequiredField,
                _ => SignupError::PersistenceFailure(message.clone()),
            }
        }
        other => {
            tracing::error!(error = %other, "Signup insert failed");
            SignupError::unexpected()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
