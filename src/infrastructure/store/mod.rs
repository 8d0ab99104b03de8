//! Document store client.
//!
//! Releases and admin credentials live as JSON documents inside named
//! containers. The rest of the service only talks to [`DocumentStore`], so the
//! backing engine (PostgreSQL JSONB or the in-process store) is swappable at
//! startup.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::config::settings::{AppConfig, StoreBackend};
use crate::infrastructure::db::pool::connect_to_db;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// A stored JSON object.
pub type Document = Map<String, Value>;

pub type SharedStore = Arc<dyn DocumentStore>;

pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Releases,
    Admins,
}

impl Container {
    pub const ALL: [Container; 2] = [Container::Releases, Container::Admins];

    pub fn name(self) -> &'static str {
        match self {
            Container::Releases => "releases",
            Container::Admins => "admins",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: &'static str, value: String },
    StartsWith { field: &'static str, prefix: String },
}

impl Filter {
    /// In-process evaluation; only string-valued fields can match.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::Eq { field, value } => string_field(document, field) == Some(value.as_str()),
            Filter::StartsWith { field, prefix } => {
                string_field(document, field).is_some_and(|v| v.starts_with(prefix.as_str()))
            }
        }
    }
}

/// Parameterized read against a single container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    /// Sorted descending; documents without a string value sort last.
    pub order_by_desc: Option<&'static str>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq { field, value: value.into() });
        self
    }

    pub fn starts_with(mut self, field: &'static str, prefix: impl Into<String>) -> Self {
        self.filters.push(Filter::StartsWith { field, prefix: prefix.into() });
        self
    }

    pub fn order_by_desc(mut self, field: &'static str) -> Self {
        self.order_by_desc = Some(field);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Outcome of one operation inside a bulk write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResult {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkItemResult {
    pub fn created(resource: Document) -> Self {
        Self { status_code: 201, resource: Some(resource), error: None }
    }

    pub fn failed(status_code: u16, error: impl Into<String>) -> Self {
        Self { status_code, resource: None, error: Some(error.into()) }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("a document with id `{0}` already exists")]
    Conflict(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists one document, assigning an `id` when it has none.
    async fn create(&self, container: Container, document: Document) -> Result<Document, StoreError>;

    /// Persists many documents in one batched request. Every input yields one
    /// result at the same position; a failing item never blocks the others.
    async fn bulk_create(
        &self,
        container: Container,
        documents: Vec<Document>,
    ) -> Result<Vec<BulkItemResult>, StoreError>;

    async fn query(&self, container: Container, query: &Query) -> Result<Vec<Document>, StoreError>;
}

/// Reads the document id, generating one when absent.
pub(crate) fn ensure_id(document: &mut Document) -> Result<String, StoreError> {
    match document.get(ID_FIELD) {
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(_) => Err(StoreError::InvalidDocument("`id` must be a non-empty string".to_string())),
    }
}

pub(crate) fn string_field<'a>(document: &'a Document, field: &str) -> Option<&'a str> {
    document.get(field).and_then(Value::as_str)
}

/// Opens the backend named by the configuration.
pub async fn connect(config: &AppConfig) -> anyhow::Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = connect_to_db(url, config.db_max_connections).await?;
            let store = PgDocumentStore::new(pool);
            store.ensure_containers().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
