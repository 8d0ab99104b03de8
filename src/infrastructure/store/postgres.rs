use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::{debug, info};

use super::{
    BulkItemResult, Container, Document, DocumentStore, Filter, Query, StoreError,
    ensure_id,
};
use crate::infrastructure::db::pool::DbPool;

/// Containers are tables of `(id TEXT PRIMARY KEY, doc JSONB)`; the `id`
/// column mirrors the document's own `id` field.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Creates missing container tables. Existing tables are left untouched.
    pub async fn ensure_containers(&self) -> Result<(), StoreError> {
        for container in Container::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
                container.name()
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }

        info!("Document containers ready");
        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error, id: &str) -> StoreError {
    let unique_violation = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique_violation {
        StoreError::Conflict(id.to_string())
    } else {
        StoreError::Database(err)
    }
}

/// Flags every repeat of an id already seen earlier in the batch.
fn mark_batch_duplicates(ids: &[Option<String>]) -> Vec<bool> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(|id| match id {
            Some(id) => !seen.insert(id.clone()),
            None => false,
        })
        .collect()
}

/// Pushes an expression that yields the field's text only when the JSON
/// value is a string, and NULL otherwise.
fn push_string_field(qb: &mut QueryBuilder<'static, Postgres>, field: &'static str) {
    qb.push("CASE WHEN jsonb_typeof(doc -> ")
        .push_bind(field)
        .push(") = 'string' THEN doc ->> ")
        .push_bind(field)
        .push(" END");
}

fn build_select(container: Container, query: &Query) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT doc FROM ");
    qb.push(container.name()).push(" WHERE TRUE");

    for filter in &query.filters {
        match filter {
            Filter::Eq { field, value } => {
                qb.push(" AND ");
                push_string_field(&mut qb, *field);
                qb.push(" = ").push_bind(value.clone());
            }
            Filter::StartsWith { field, prefix } => {
                qb.push(" AND starts_with(");
                push_string_field(&mut qb, *field);
                qb.push(", ").push_bind(prefix.clone()).push(")");
            }
        }
    }

    if let Some(field) = query.order_by_desc {
        qb.push(" ORDER BY ");
        push_string_field(&mut qb, field);
        qb.push(" DESC NULLS LAST");
    }

    if let Some(limit) = query.limit {
        qb.push(" LIMIT ").push_bind(limit);
    }

    qb
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, container: Container, mut document: Document) -> Result<Document, StoreError> {
        let id = ensure_id(&mut document)?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING doc",
            container.name()
        );

        let Json(stored) = sqlx::query_scalar::<_, Json<Document>>(&sql)
            .bind(&id)
            .bind(Json(&document))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &id))?;

        Ok(stored)
    }

    async fn bulk_create(
        &self,
        container: Container,
        documents: Vec<Document>,
    ) -> Result<Vec<BulkItemResult>, StoreError> {
        let mut results: Vec<Option<BulkItemResult>> = Vec::with_capacity(documents.len());
        let mut prepared = Vec::with_capacity(documents.len());
        let mut ids = Vec::with_capacity(documents.len());

        for mut document in documents {
            match ensure_id(&mut document) {
                Ok(id) => {
                    ids.push(Some(id));
                    results.push(None);
                }
                Err(e) => {
                    ids.push(None);
                    results.push(Some(BulkItemResult::failed(400, e.to_string())));
                }
            }
            prepared.push(document);
        }

        let duplicates = mark_batch_duplicates(&ids);
        let mut batch = Vec::new();
        for (index, id) in ids.iter().enumerate() {
            match id {
                Some(id) if duplicates[index] => {
                    results[index] = Some(BulkItemResult::failed(
                        409,
                        StoreError::Conflict(id.clone()).to_string(),
                    ));
                }
                Some(_) => batch.push(&prepared[index]),
                None => {}
            }
        }

        let inserted: HashSet<String> = if batch.is_empty() {
            HashSet::new()
        } else {
            let sql = format!(
                "INSERT INTO {} (id, doc) \
                 SELECT item ->> 'id', item FROM jsonb_array_elements($1::jsonb) AS item \
                 ON CONFLICT (id) DO NOTHING \
                 RETURNING id",
                container.name()
            );
            debug!(container = container.name(), items = batch.len(), "bulk insert");

            sqlx::query_scalar::<_, String>(&sql)
                .bind(Json(&batch))
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .collect()
        };

        let results = results
            .into_iter()
            .zip(prepared)
            .zip(ids)
            .map(|((result, document), id)| match (result, id) {
                (Some(result), _) => result,
                (None, Some(id)) if inserted.contains(&id) => BulkItemResult::created(document),
                (None, Some(id)) => BulkItemResult::failed(409, StoreError::Conflict(id).to_string()),
                (None, None) => BulkItemResult::failed(400, "document was not prepared"),
            })
            .collect();

        Ok(results)
    }

    async fn query(&self, container: Container, query: &Query) -> Result<Vec<Document>, StoreError> {
        debug!(container = container.name(), ?query, "document query");

        let mut select = build_select(container, query);
        let rows = select
            .build_query_scalar::<Json<Document>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|Json(document)| document).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::pool::connect_to_db;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn batch_duplicates_after_first_are_flagged() {
        let ids = vec![Some("a".to_string()), None, Some("a".to_string()), Some("b".to_string())];
        assert_eq!(mark_batch_duplicates(&ids), vec![false, false, true, false]);
    }

    #[test]
    fn select_binds_every_value() {
        let query = Query::new()
            .starts_with("releaseDate", "2025")
            .order_by_desc("releaseDate")
            .limit(5);
        let qb = build_select(Container::Releases, &query);

        assert_eq!(
            qb.sql(),
            "SELECT doc FROM releases WHERE TRUE \
             AND starts_with(CASE WHEN jsonb_typeof(doc -> $1) = 'string' THEN doc ->> $2 END, $3) \
             ORDER BY CASE WHEN jsonb_typeof(doc -> $4) = 'string' THEN doc ->> $5 END DESC NULLS LAST \
             LIMIT $6"
        );
    }

    #[test]
    fn select_with_equality_filters() {
        let query = Query::new().eq("username", "admin").eq("password", "pw").limit(1);
        let qb = build_select(Container::Admins, &query);

        assert_eq!(
            qb.sql(),
            "SELECT doc FROM admins WHERE TRUE \
             AND CASE WHEN jsonb_typeof(doc -> $1) = 'string' THEN doc ->> $2 END = $3 \
             AND CASE WHEN jsonb_typeof(doc -> $4) = 'string' THEN doc ->> $5 END = $6 \
             LIMIT $7"
        );
    }

    async fn live_store() -> PgDocumentStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = connect_to_db(&url, 2).await.unwrap();
        let store = PgDocumentStore::new(pool);
        store.ensure_containers().await.unwrap();
        store
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL database in DATABASE_URL"]
    async fn non_string_dates_are_not_matched_or_sorted() {
        let store = live_store().await;
        let tag = Uuid::new_v4().to_string();
        let ids: Vec<String> = (0..4).map(|i| format!("{tag}-{i}")).collect();

        let results = store
            .bulk_create(
                Container::Releases,
                vec![
                    doc(json!({ "id": ids[0], "releaseDate": 19010101 })),
                    doc(json!({ "id": ids[1], "releaseDate": "1901-03-01" })),
                    doc(json!({ "id": ids[2], "releaseDate": "1901-09-01" })),
                    doc(json!({ "id": ids[3], "releaseDate": ["1901"] })),
                ],
            )
            .await
            .unwrap();
        assert!(results.iter().all(BulkItemResult::is_success));

        let query = Query::new()
            .starts_with("releaseDate", "1901")
            .order_by_desc("releaseDate");
        let rows = store.query(Container::Releases, &query).await.unwrap();
        let dates: Vec<&serde_json::Value> = rows
            .iter()
            .filter(|d| d["id"].as_str().is_some_and(|id| id.starts_with(&tag)))
            .map(|d| &d["releaseDate"])
            .collect();

        assert_eq!(dates, vec![&json!("1901-09-01"), &json!("1901-03-01")]);
    }

    #[tokio::test]
    #[ignore = "needs a PostgreSQL database in DATABASE_URL"]
    async fn equality_ignores_non_string_values() {
        let store = live_store().await;
        let username = Uuid::new_v4().to_string();
        store
            .create(Container::Admins, doc(json!({ "username": username, "password": 1234 })))
            .await
            .unwrap();

        let query = Query::new().eq("username", username.clone()).eq("password", "1234");
        assert!(store.query(Container::Admins, &query).await.unwrap().is_empty());

        let by_name = Query::new().eq("username", username);
        assert_eq!(store.query(Container::Admins, &by_name).await.unwrap().len(), 1);
    }
}
