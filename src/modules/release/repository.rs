use super::model::RELEASE_DATE_FIELD;
use crate::infrastructure::store::{
    BulkItemResult, Container, Document, DocumentStore, Query, StoreError,
};

pub struct ReleaseRepository;

impl ReleaseRepository {
    pub async fn create(store: &dyn DocumentStore, release: Document) -> Result<Document, StoreError> {
        store.create(Container::Releases, release).await
    }

    pub async fn create_many(
        store: &dyn DocumentStore,
        releases: Vec<Document>,
    ) -> Result<Vec<BulkItemResult>, StoreError> {
        store.bulk_create(Container::Releases, releases).await
    }

    /// Releases whose `releaseDate` starts with `year`, newest first. The
    /// string sort is only meaningful because dates are stored ISO-style.
    pub async fn find_by_year(store: &dyn DocumentStore, year: &str) -> Result<Vec<Document>, StoreError> {
        let query = Query::new()
            .starts_with(RELEASE_DATE_FIELD, year)
            .order_by_desc(RELEASE_DATE_FIELD);

        store.query(Container::Releases, &query).await
    }
}
