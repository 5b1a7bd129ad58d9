//! In-process [`RemoteStore`] for tests and local development.
//!
//! Mirrors the hosted store closely enough for the repositories to behave
//! the same way: serial `id`s, a default `created_at`, declared unique and
//! not-null columns, and the same SQLSTATE codes on violation. All
//! collections live behind one lock, so every operation is atomic.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use mg_core::types::DbId;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error_codes::{NOT_NULL_VIOLATION, UNDEFINED_TABLE, UNIQUE_VIOLATION};
use crate::repositories::{SIGNUP_COLLECTION, SONG_COLLECTION};
use crate::store::{Filter, Order, RemoteStore, StoreError};

/// Column constraints for one in-memory collection.
#[derive(Debug, Clone)]
pub struct CollectionSchema {
    name: String,
    unique: Vec<String>,
    not_null: Vec<String>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: Vec::new(),
            not_null: Vec::new(),
        }
    }

    pub fn unique(mut self, column: impl Into<String>) -> Self {
        self.unique.push(column.into());
        self
    }

    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.not_null.push(column.into());
        self
    }
}

type Row = Map<String, Value>;

struct Collection {
    schema: CollectionSchema,
    next_id: DbId,
    rows: Vec<Row>,
}

impl Collection {
    fn check_not_null(&self, row: &Row) -> Result<(), StoreError> {
        for column in &self.schema.not_null {
            if row.get(column).is_none_or(Value::is_null) {
                let values: Vec<String> = row.values().map(display_scalar).collect();
                return Err(StoreError::Api {
                    status: 400,
                    code: Some(NOT_NULL_VIOLATION.to_string()),
                    message: format!(
                        "null value in column \"{column}\" of relation \"{}\" violates not-null constraint",
                        self.schema.name
                    ),
                    details: Some(format!("Failing row contains ({}).", values.join(", "))),
                    hint: None,
                });
            }
        }
        Ok(())
    }

    /// Check `row` against every stored row except the one with `skip_id`.
    fn check_unique(&self, row: &Row, skip_id: Option<&Value>) -> Result<(), StoreError> {
        for column in &self.schema.unique {
            let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = self
                .rows
                .iter()
                .filter(|existing| skip_id.is_none() || existing.get("id") != skip_id)
                .any(|existing| existing.get(column) == Some(value));
            if taken {
                return Err(StoreError::Api {
                    status: 409,
                    code: Some(UNIQUE_VIOLATION.to_string()),
                    message: format!(
                        "duplicate key value violates unique constraint \"{}_{column}_key\"",
                        self.schema.name
                    ),
                    details: Some(format!(
                        "Key ({column})=({}) already exists.",
                        display_scalar(value)
                    )),
                    hint: None,
                });
            }
        }
        Ok(())
    }
}

struct Inner {
    collections: HashMap<String, Collection>,
    pending_failures: VecDeque<StoreError>,
}

/// A [`RemoteStore`] backed by in-process collections.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// A store with the given collections and nothing else.
    pub fn new(schemas: impl IntoIterator<Item = CollectionSchema>) -> Self {
        let collections = schemas
            .into_iter()
            .map(|schema| {
                (
                    schema.name.clone(),
                    Collection {
                        schema,
                        next_id: 1,
                        rows: Vec::new(),
                    },
                )
            })
            .collect();
        Self {
            inner: Mutex::new(Inner {
                collections,
                pending_failures: VecDeque::new(),
            }),
        }
    }

    /// A store with the `beta_signups` and `songs` collections as deployed
    /// by the migrations.
    pub fn with_default_schema() -> Self {
        Self::new([
            CollectionSchema::new(SIGNUP_COLLECTION)
                .unique("email")
                .not_null("name")
                .not_null("email"),
            CollectionSchema::new(SONG_COLLECTION)
                .not_null("title")
                .not_null("artist"),
        ])
    }

    /// Make the next operation fail with `err` instead of touching data.
    pub async fn fail_next(&self, err: StoreError) {
        self.inner.lock().await.pending_failures.push_back(err);
    }

    /// Number of rows currently stored in `collection`.
    pub async fn row_count(&self, collection: &str) -> usize {
        self.inner
            .lock()
            .await
            .collections
            .get(collection)
            .map_or(0, |c| c.rows.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_default_schema()
    }
}

impl Inner {
    fn take_failure(&mut self) -> Result<(), StoreError> {
        match self.pending_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn collection(&mut self, name: &str) -> Result<&mut Collection, StoreError> {
        self.collections.get_mut(name).ok_or_else(|| {
            StoreError::api(
                404,
                UNDEFINED_TABLE,
                format!("relation \"public.{name}\" does not exist"),
            )
        })
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn insert(&self, collection: &str, record: Value) -> Result<Vec<Value>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        let collection = inner.collection(collection)?;

        let mut row = into_row(record)?;
        if !row.contains_key("id") {
            row.insert("id".into(), Value::from(collection.next_id));
        }
        if row.get("created_at").is_none_or(Value::is_null) {
            row.insert(
                "created_at".into(),
                Value::from(
                    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
                ),
            );
        }

        collection.check_not_null(&row)?;
        collection.check_unique(&row, None)?;

        collection.next_id += 1;
        collection.rows.push(row.clone());
        Ok(vec![Value::Object(row)])
    }

    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        let collection = inner.collection(collection)?;

        let mut rows: Vec<&Row> = collection
            .rows
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .collect();

        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column))
                    .then_with(|| compare_values(a.get("id"), b.get("id")));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        Ok(rows.into_iter().cloned().map(Value::Object).collect())
    }

    async fn update(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        let collection = inner.collection(collection)?;
        let patch = into_row(patch)?;

        // Build every updated row first so a violation leaves nothing applied.
        let mut updated = Vec::new();
        for (index, row) in collection.rows.iter().enumerate() {
            if !filters.iter().all(|f| f.matches(row)) {
                continue;
            }
            let mut next = row.clone();
            for (column, value) in &patch {
                if column != "id" {
                    next.insert(column.clone(), value.clone());
                }
            }
            collection.check_not_null(&next)?;
            collection.check_unique(&next, next.get("id"))?;
            updated.push((index, next));
        }

        let mut result = Vec::with_capacity(updated.len());
        for (index, row) in updated {
            result.push(Value::Object(row.clone()));
            collection.rows[index] = row;
        }
        Ok(result)
    }

    async fn delete(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()?;
        let collection = inner.collection(collection)?;

        let (removed, kept): (Vec<Row>, Vec<Row>) = collection
            .rows
            .drain(..)
            .partition(|row| filters.iter().all(|f| f.matches(row)));
        collection.rows = kept;

        Ok(removed.into_iter().map(Value::Object).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.take_failure()
    }
}

fn into_row(value: Value) -> Result<Row, StoreError> {
    match value {
        Value::Object(row) => Ok(row),
        _ => Err(StoreError::api(400, "PGRST102", "Empty or invalid json")),
    }
}

/// Nulls first, numbers numerically, strings lexically (RFC 3339
/// timestamps sort correctly this way).
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
