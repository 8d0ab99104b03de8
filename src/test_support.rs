//! Shared fixtures for handler and service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::settings::AppConfig;
use crate::infrastructure::store::{
    BulkItemResult, Container, Document, DocumentStore, MemoryStore, Query, StoreError,
};
use crate::modules::admin::repository::AdminRepository;
use crate::state::AppState;

#[derive(Default)]
struct Inner {
    store: MemoryStore,
    queries: AtomicUsize,
    writes: AtomicUsize,
    fail_next: AtomicBool,
}

/// In-memory store that counts calls and can be told to fail once.
#[derive(Clone, Default)]
pub struct TestStore {
    inner: Arc<Inner>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_admin(username: &str, password: &str) -> Self {
        let store = Self::new();
        AdminRepository::provision(&store.inner.store, username, password)
            .await
            .unwrap();
        store
    }

    pub fn queries(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self) {
        self.inner.fail_next.store(true, Ordering::SeqCst);
    }

    /// Inserts directly, bypassing counters.
    pub async fn insert(&self, container: Container, document: Value) -> Document {
        let Value::Object(document) = document else {
            panic!("fixture documents must be objects");
        };
        self.inner.store.create(container, document).await.unwrap()
    }

    pub async fn all(&self, container: Container) -> Vec<Document> {
        self.inner.store.query(container, &Query::new()).await.unwrap()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        if self.inner.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for TestStore {
    async fn create(&self, container: Container, document: Document) -> Result<Document, StoreError> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.store.create(container, document).await
    }

    async fn bulk_create(
        &self,
        container: Container,
        documents: Vec<Document>,
    ) -> Result<Vec<BulkItemResult>, StoreError> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.store.bulk_create(container, documents).await
    }

    async fn query(&self, container: Container, query: &Query) -> Result<Vec<Document>, StoreError> {
        self.inner.queries.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.store.query(container, query).await
    }
}

pub fn test_state(store: TestStore) -> AppState {
    AppState::new(AppConfig::in_memory(), Arc::new(store))
}
