use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::infrastructure::store::Document;

pub const RELEASE_DATE_FIELD: &str = "releaseDate";
pub const CREATED_DATE_FIELD: &str = "createdDate";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: String,
    pub title: String,
    pub director: String,
    pub genre: String,
    pub studio: String,
    /// ISO-8601 date; the first four characters are the release year.
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
}

fn text(document: &Document, field: &str) -> String {
    match document.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Release {
    /// Reads a stored document without failing on unexpected value types.
    pub fn from_document(document: &Document) -> Self {
        let created = text(document, CREATED_DATE_FIELD);
        Self {
            id: text(document, "id"),
            title: text(document, "title"),
            director: text(document, "director"),
            genre: text(document, "genre"),
            studio: text(document, "studio"),
            release_date: text(document, RELEASE_DATE_FIELD),
            created_date: (!created.is_empty()).then_some(created),
        }
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date.get(..4)
    }
}
