//! REST client for the hosted store.
//!
//! Speaks the PostgREST dialect exposed under `{url}/rest/v1`: one resource
//! per collection, `column=eq.value` filters, `order=column.desc`, and
//! `Prefer: return=representation` so writes echo the affected rows.
//! Rejections carry a JSON body of `{ code, message, details, hint }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::config::StoreConfig;
use crate::store::{Filter, Order, RemoteStore, StoreError};

/// HTTP client for one hosted store project.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    schema: String,
}

/// Error body returned by the REST layer on rejection.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl RestStore {
    /// Build a client from configuration.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &StoreConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            schema: config.schema.clone(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    /// Start a request carrying auth, schema and representation headers.
    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Accept-Profile", &self.schema)
            .header("Content-Profile", &self.schema)
            .header("Prefer", "return=representation")
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`StoreError::Api`], passing the
    /// response through unchanged on success.
    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        Err(match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(parsed) => StoreError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed.message.unwrap_or_else(|| fallback_message(status, &body)),
                details: parsed.details,
                hint: parsed.hint,
            },
            Err(_) => StoreError::Api {
                status: status.as_u16(),
                code: None,
                message: fallback_message(status, &body),
                details: None,
                hint: None,
            },
        })
    }

    /// Read the affected rows from a successful response.
    async fn rows(response: Response) -> Result<Vec<Value>, StoreError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        parse_rows(&body)
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn insert(&self, collection: &str, record: Value) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(Method::POST, self.collection_url(collection))
            .json(&record)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(encode_query(filters, order));

        let response = self
            .request(Method::GET, self.collection_url(collection))
            .query(&params)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn update(
        &self,
        collection: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(Method::PATCH, self.collection_url(collection))
            .query(&encode_query(filters, None))
            .json(&patch)
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn delete(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>, StoreError> {
        let response = self
            .request(Method::DELETE, self.collection_url(collection))
            .query(&encode_query(filters, None))
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .request(Method::GET, format!("{}/rest/v1/", self.base_url))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Encode filters and ordering as REST query parameters.
pub fn encode_query(filters: &[Filter], order: Option<&Order>) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq(column, value) => (column.clone(), format!("eq.{}", scalar_text(value))),
        })
        .collect();

    if let Some(order) = order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }

    params
}

/// Interpret a success body: an array of rows, a single row, or nothing.
pub fn parse_rows(body: &str) -> Result<Vec<Value>, StoreError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body)? {
        Value::Array(rows) => Ok(rows),
        row @ Value::Object(_) => Ok(vec![row]),
        other => Err(StoreError::Decode(format!(
            "expected rows, got {}",
            type_name(&other)
        ))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fallback_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Store request rejected")
            .to_string()
    } else {
        body.to_string()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
