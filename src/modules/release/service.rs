use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};
use validator::Validate;

use super::dto::{BulkSummary, InvalidItem, ReleasesQuery};
use super::model::CREATED_DATE_FIELD;
use super::repository::ReleaseRepository;
use super::validator::missing_fields;
use crate::infrastructure::store::{Document, StoreError};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("Invalid request body: {0}")]
    MalformedBody(String),
    #[error("Request body must be a release object or an array of release objects.")]
    UnsupportedBody,
    #[error("Request body must contain at least one release.")]
    EmptyBatch,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("No valid releases to submit.")]
    NoValidItems(Vec<InvalidItem>),
    #[error("The \"year\" query parameter is required.")]
    MissingYear,
    #[error("Failed to save release: {0}")]
    Save(StoreError),
    #[error("Failed to retrieve releases: {0}")]
    Retrieve(StoreError),
    #[error("Failed to stamp creation date: {0}")]
    Timestamp(#[from] time::error::Format),
}

fn stamp_created(release: &mut Document) -> Result<(), ReleaseError> {
    let now = OffsetDateTime::now_utc().format(&Rfc3339)?;
    release.insert(CREATED_DATE_FIELD.to_string(), Value::String(now));
    Ok(())
}

fn rejection_reason(item: &Value) -> Option<String> {
    match item {
        Value::Object(candidate) => {
            let missing = missing_fields(candidate);
            (!missing.is_empty()).then(|| ReleaseError::MissingFields(missing).to_string())
        }
        _ => Some("Item is not a JSON object.".to_string()),
    }
}

pub struct ReleaseService;

impl ReleaseService {
    pub async fn create(state: AppState, mut candidate: Document) -> Result<Document, ReleaseError> {
        let missing = missing_fields(&candidate);
        if !missing.is_empty() {
            return Err(ReleaseError::MissingFields(missing));
        }

        stamp_created(&mut candidate)?;

        let created = ReleaseRepository::create(state.store.as_ref(), candidate)
            .await
            .map_err(|e| {
                error!("Release create failed: {}", e);
                ReleaseError::Save(e)
            })?;

        Ok(created)
    }

    /// Validates every item independently and writes the survivors in one
    /// batch. Invalid items are reported by their original index.
    pub async fn create_many(state: AppState, items: Vec<Value>) -> Result<BulkSummary, ReleaseError> {
        if items.is_empty() {
            return Err(ReleaseError::EmptyBatch);
        }

        let total_submitted = items.len();
        let mut invalid_items = Vec::new();
        let mut batch = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            if let Some(reason) = rejection_reason(&item) {
                invalid_items.push(InvalidItem { index, reason });
                continue;
            }
            if let Value::Object(mut release) = item {
                stamp_created(&mut release)?;
                batch.push(release);
            }
        }

        if batch.is_empty() {
            return Err(ReleaseError::NoValidItems(invalid_items));
        }

        let results = ReleaseRepository::create_many(state.store.as_ref(), batch)
            .await
            .map_err(|e| {
                error!("Bulk release write failed: {}", e);
                ReleaseError::Save(e)
            })?;

        let successful = results.iter().filter(|r| r.is_success()).count();
        for result in results.iter().filter(|r| !r.is_success()) {
            warn!(
                status = result.status_code,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Bulk item rejected by store"
            );
        }

        info!(total_submitted, successful, invalid = invalid_items.len(), "Bulk submission processed");

        Ok(BulkSummary {
            message: format!("Bulk submission processed: {successful} of {total_submitted} releases created."),
            total_submitted,
            successful,
            failed: total_submitted - successful,
            invalid_items,
        })
    }

    pub async fn find_by_year(state: AppState, query: &ReleasesQuery) -> Result<Vec<Document>, ReleaseError> {
        query.validate().map_err(|_| ReleaseError::MissingYear)?;
        let year = query.year.as_deref().ok_or(ReleaseError::MissingYear)?;

        ReleaseRepository::find_by_year(state.store.as_ref(), year)
            .await
            .map_err(|e| {
                error!("Release query failed: {}", e);
                ReleaseError::Retrieve(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::Container;
    use crate::test_support::{TestStore, test_state};
    use serde_json::json;

    fn release(title: &str, date: &str) -> Value {
        json!({
            "title": title,
            "director": "Someone",
            "genre": "Drama",
            "studio": "A24",
            "releaseDate": date
        })
    }

    fn year(value: &str) -> ReleasesQuery {
        ReleasesQuery { year: Some(value.to_string()) }
    }

    #[tokio::test]
    async fn create_stamps_and_returns_record() {
        let store = TestStore::new();
        let Value::Object(candidate) = release("Past Lives", "2023-06-02") else { unreachable!() };

        let created = ReleaseService::create(test_state(store.clone()), candidate).await.unwrap();

        assert_eq!(created["title"], json!("Past Lives"));
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert!(OffsetDateTime::parse(created["createdDate"].as_str().unwrap(), &Rfc3339).is_ok());
        assert_eq!(store.all(Container::Releases).await.len(), 1);
    }

    #[tokio::test]
    async fn create_with_missing_fields_never_writes() {
        let store = TestStore::new();
        let Value::Object(candidate) = json!({ "title": "Untitled" }) else { unreachable!() };

        let err = ReleaseService::create(test_state(store.clone()), candidate).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: director, genre, studio, releaseDate"
        );
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn create_surfaces_store_failure() {
        let store = TestStore::new();
        store.fail_next();
        let Value::Object(candidate) = release("Tár", "2022-10-07") else { unreachable!() };

        let err = ReleaseService::create(test_state(store), candidate).await.unwrap_err();
        assert!(matches!(err, ReleaseError::Save(_)));
        assert!(err.to_string().starts_with("Failed to save release: "));
    }

    #[tokio::test]
    async fn bulk_counts_valid_and_invalid_rows() {
        let store = TestStore::new();
        let items = vec![
            release("A", "2025-01-01"),
            json!({ "title": "B" }),
            release("C", "2025-03-01"),
            json!("not an object"),
            release("E", "2025-05-01"),
        ];

        let summary = ReleaseService::create_many(test_state(store.clone()), items).await.unwrap();

        assert_eq!(summary.total_submitted, 5);
        assert_eq!(summary.successful, 3);
        assert_eq!(summary.failed, 2);
        let indices: Vec<usize> = summary.invalid_items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(
            summary.invalid_items[0].reason,
            "Missing required fields: director, genre, studio, releaseDate"
        );
        assert_eq!(store.writes(), 1);
        assert_eq!(store.all(Container::Releases).await.len(), 3);
    }

    #[tokio::test]
    async fn bulk_reports_store_level_conflicts_as_failed() {
        let store = TestStore::new();
        store.insert(Container::Releases, json!({ "id": "dup" })).await;
        let mut duplicate = release("Dup", "2025-02-02");
        duplicate["id"] = json!("dup");

        let summary = ReleaseService::create_many(
            test_state(store),
            vec![release("Fresh", "2025-01-01"), duplicate],
        )
        .await
        .unwrap();

        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.invalid_items.is_empty());
    }

    #[tokio::test]
    async fn bulk_with_no_valid_rows_is_rejected() {
        let store = TestStore::new();
        let err = ReleaseService::create_many(
            test_state(store.clone()),
            vec![json!({}), json!({ "title": "x" })],
        )
        .await
        .unwrap_err();

        match err {
            ReleaseError::NoValidItems(items) => assert_eq!(items.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn bulk_rejects_empty_array() {
        let err = ReleaseService::create_many(test_state(TestStore::new()), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ReleaseError::EmptyBatch));
    }

    #[tokio::test]
    async fn find_by_year_filters_and_sorts_descending() {
        let store = TestStore::new();
        for (title, date) in [
            ("Old", "2024-12-31"),
            ("Spring", "2025-04-01"),
            ("Winter", "2025-12-01"),
            ("Summer", "2025-07-15"),
            ("Next", "2026-01-01"),
        ] {
            store.insert(Container::Releases, release(title, date)).await;
        }

        let rows = ReleaseService::find_by_year(test_state(store), &year("2025")).await.unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r["releaseDate"].as_str().unwrap()).collect();
        assert_eq!(dates, vec!["2025-12-01", "2025-07-15", "2025-04-01"]);
    }

    #[tokio::test]
    async fn find_by_year_requires_year_without_querying() {
        let store = TestStore::new();
        let state = test_state(store.clone());

        let err = ReleaseService::find_by_year(state.clone(), &ReleasesQuery { year: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ReleaseError::MissingYear));

        let err = ReleaseService::find_by_year(state, &year("")).await.unwrap_err();
        assert!(matches!(err, ReleaseError::MissingYear));
        assert_eq!(store.queries(), 0);
    }
}
