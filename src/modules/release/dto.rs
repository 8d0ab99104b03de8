use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReleasesQuery {
    /// Year prefix matched against `releaseDate`, e.g. `2025`.
    #[validate(
        required(message = "The \"year\" query parameter is required."),
        length(min = 1, message = "The \"year\" query parameter is required.")
    )]
    pub year: Option<String>,
}

/// Shape of a submitted release. Extra fields are stored as sent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRelease {
    pub title: String,
    pub director: String,
    pub genre: String,
    pub studio: String,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InvalidItem {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSummary {
    pub message: String,
    pub total_submitted: usize,
    pub successful: usize,
    pub failed: usize,
    pub invalid_items: Vec<InvalidItem>,
}
