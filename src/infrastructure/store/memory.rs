use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    BulkItemResult, Container, Document, DocumentStore, ID_FIELD, Query, StoreError,
    ensure_id, string_field,
};

/// Process-local store. Documents are kept per container in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    containers: RwLock<HashMap<Container, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_id(documents: &[Document], id: &str) -> bool {
    documents.iter().any(|d| string_field(d, ID_FIELD) == Some(id))
}

fn compare_field(a: &Document, b: &Document, field: &str) -> Ordering {
    string_field(a, field).cmp(&string_field(b, field))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, container: Container, mut document: Document) -> Result<Document, StoreError> {
        let id = ensure_id(&mut document)?;
        let mut containers = self.containers.write().await;
        let documents = containers.entry(container).or_default();

        if contains_id(documents, &id) {
            return Err(StoreError::Conflict(id));
        }

        documents.push(document.clone());
        Ok(document)
    }

    async fn bulk_create(
        &self,
        container: Container,
        documents: Vec<Document>,
    ) -> Result<Vec<BulkItemResult>, StoreError> {
        let mut containers = self.containers.write().await;
        let stored = containers.entry(container).or_default();
        let mut results = Vec::with_capacity(documents.len());

        for mut document in documents {
            let id = match ensure_id(&mut document) {
                Ok(id) => id,
                Err(e) => {
                    results.push(BulkItemResult::failed(400, e.to_string()));
                    continue;
                }
            };

            if contains_id(stored, &id) {
                results.push(BulkItemResult::failed(409, StoreError::Conflict(id).to_string()));
                continue;
            }

            stored.push(document.clone());
            results.push(BulkItemResult::created(document));
        }

        Ok(results)
    }

    async fn query(&self, container: Container, query: &Query) -> Result<Vec<Document>, StoreError> {
        let containers = self.containers.read().await;
        let Some(documents) = containers.get(&container) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<Document> = documents
            .iter()
            .filter(|d| query.filters.iter().all(|f| f.matches(d)))
            .cloned()
            .collect();

        if let Some(field) = query.order_by_desc {
            rows.sort_by(|a, b| compare_field(b, a, field));
        }

        if let Some(limit) = query.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(rows)
    }
}
