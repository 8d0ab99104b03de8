use super::dto::{NewRelease, ReleasesQuery};
use super::model::Release;
use super::service::{ReleaseError, ReleaseService};
use crate::common::response::{ApiError, ApiSuccess, ErrorBody};
use crate::modules::admin::model::AdminIdentity;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use tracing::info;

impl From<ReleaseError> for ApiError {
    fn from(err: ReleaseError) -> Self {
        let message = err.to_string();
        match err {
            ReleaseError::NoValidItems(items) => ApiError::bad_request(message)
                .with_invalid_items(serde_json::to_value(items).unwrap_or(Value::Null)),
            ReleaseError::MalformedBody(_)
            | ReleaseError::UnsupportedBody
            | ReleaseError::EmptyBatch
            | ReleaseError::MissingFields(_)
            | ReleaseError::MissingYear => ApiError::bad_request(message),
            ReleaseError::Save(_) | ReleaseError::Retrieve(_) | ReleaseError::Timestamp(_) => {
                ApiError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Create one release, or many when the body is an array
#[utoipa::path(
    post,
    path = "/api/createrelease",
    request_body(
        content = NewRelease,
        description = "A release object, or an array of release objects for bulk submission"
    ),
    responses(
        (status = 201, description = "The created release for an object body; a BulkSummary for an array body", body = Release),
        (status = 400, description = "Missing fields, empty or malformed body", body = ErrorBody),
        (status = 401, description = "Missing or invalid admin credentials", body = ErrorBody),
        (status = 405, description = "Only POST is allowed", body = ErrorBody),
        (status = 500, description = "Document store failure", body = ErrorBody)
    ),
    tag = "Releases",
    security(("admin_username" = [], "admin_password" = []))
)]
pub async fn create_release(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            return ApiError::from(ReleaseError::MalformedBody(rejection.body_text())).into_response();
        }
    };

    match payload {
        Value::Object(candidate) => {
            info!(admin = %admin.username, "Creating release");
            match ReleaseService::create(state, candidate).await {
                Ok(created) => ApiSuccess(created, StatusCode::CREATED).into_response(),
                Err(e) => ApiError::from(e).into_response(),
            }
        }
        Value::Array(items) => {
            info!(admin = %admin.username, items = items.len(), "Creating releases in bulk");
            match ReleaseService::create_many(state, items).await {
                Ok(summary) => ApiSuccess(summary, StatusCode::CREATED).into_response(),
                Err(e) => ApiError::from(e).into_response(),
            }
        }
        _ => ApiError::from(ReleaseError::UnsupportedBody).into_response(),
    }
}

/// List releases for a year, most recent first
#[utoipa::path(
    get,
    path = "/api/getreleases",
    params(ReleasesQuery),
    responses(
        (status = 200, description = "Releases whose releaseDate starts with the year", body = Vec<Release>),
        (status = 400, description = "Missing year", body = ErrorBody),
        (status = 500, description = "Document store failure", body = ErrorBody)
    ),
    tag = "Releases"
)]
pub async fn get_releases(
    State(state): State<AppState>,
    query: Result<Query<ReleasesQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return ApiError::bad_request(rejection.body_text()).into_response(),
    };

    match ReleaseService::find_by_year(state, &query).await {
        Ok(releases) => ApiSuccess(releases, StatusCode::OK).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new("Only POST requests are allowed.", StatusCode::METHOD_NOT_ALLOWED)
}
