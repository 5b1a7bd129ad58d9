//! The remote store capability.
//!
//! The hosted backend is reached only through [`RemoteStore`]: four
//! collection operations plus a health check. Rows travel as JSON objects;
//! typed decoding happens in the repositories.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error_codes::{self, ConstraintKind};

/// A row predicate. Equality is all the repositories need.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(column.into(), value.into())
    }

    /// Whether a row satisfies this predicate.
    pub fn matches(&self, row: &serde_json::Map<String, Value>) -> bool {
        match self {
            Self::Eq(column, value) => row.get(column) == Some(value),
        }
    }
}

/// Sort order for `select`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Errors surfaced by a [`RemoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the request and said why.
    #[error("{message}")]
    Api {
        /// HTTP status of the rejection.
        status: u16,
        /// Provider error code (a PostgreSQL SQLSTATE or a `PGRST` code).
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// The request never completed (network, DNS, TLS, timeout).
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with something that could not be interpreted.
    #[error("Malformed store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Build an [`StoreError::Api`] with no details or hint.
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: Some(code.into()),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// Provider code, when the store reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Domain meaning of the provider code.
    pub fn constraint_kind(&self) -> ConstraintKind {
        error_codes::classify(self.code())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Insert/select/update/delete over named collections.
///
/// Every call is one round trip. Implementations hold no per-request state,
/// so a single handle is shared across all requests.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert one record, returning the stored row(s).
    async fn insert(&self, collection: &str, record: Value) -> Result<Vec<Value>, StoreError>;

    /// Fetch rows matching every filter, optionally ordered.
    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Apply `patch` to rows matching every filter, returning the updated rows.
    async fn update(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Remove rows matching every filter, returning the removed rows.
    async fn delete(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError>;

    /// Cheap reachability check.
    async fn health_check(&self) -> Result<(), StoreError>;
}
