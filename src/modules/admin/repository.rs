use serde_json::Value;

use super::model::{AdminCredential, PASSWORD_FIELD, USERNAME_FIELD};
use crate::infrastructure::store::{Container, Document, DocumentStore, Query, StoreError};

pub struct AdminRepository;

impl AdminRepository {
    /// Rows whose username and password both equal the given values.
    // TODO: store argon2 hashes and compare in constant time instead of a plaintext equality query.
    pub async fn find_matching(
        store: &dyn DocumentStore,
        username: &str,
        password: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let query = Query::new()
            .eq(USERNAME_FIELD, username)
            .eq(PASSWORD_FIELD, password)
            .limit(1);

        store.query(Container::Admins, &query).await
    }

    /// Inserts a credential row unless one with the same username exists.
    /// Returns `true` when a row was written.
    pub async fn provision(
        store: &dyn DocumentStore,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        let existing = store
            .query(Container::Admins, &Query::new().eq(USERNAME_FIELD, username).limit(1))
            .await?;
        if !existing.is_empty() {
            return Ok(false);
        }

        let mut document = Document::new();
        document.insert(USERNAME_FIELD.to_string(), Value::String(username.to_string()));
        document.insert(PASSWORD_FIELD.to_string(), Value::String(password.to_string()));
        store.create(Container::Admins, document).await?;
        Ok(true)
    }

    pub fn parse(document: Document) -> Result<AdminCredential, StoreError> {
        serde_json::from_value(Value::Object(document))
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))
    }
}
