use super::render::{self, ListContent};
use super::state::{View, ViewState};
use crate::modules::release::dto::ReleasesQuery;
use crate::modules::release::model::Release;
use crate::modules::release::service::ReleaseService;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use rust_embed::RustEmbed;
use serde::Deserialize;

#[derive(RustEmbed)]
#[folder = "assets"]
struct Asset;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub year: Option<String>,
}

pub async fn list_page(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Html<String> {
    let view = ViewState::new(&state.config, View::List, params.year.as_deref());
    let query = ReleasesQuery {
        year: Some(view.selected_year.to_string()),
    };

    let content = match ReleaseService::find_by_year(state, &query).await {
        Ok(documents) => ListContent::Loaded(documents.iter().map(Release::from_document).collect()),
        Err(e) => ListContent::Failed(e.to_string()),
    };

    Html(render::list_page(&view, &content))
}

pub async fn form_page(State(state): State<AppState>) -> Html<String> {
    Html(render::form_page(&ViewState::new(&state.config, View::Form, None)))
}

pub async fn bulk_page(State(state): State<AppState>) -> Html<String> {
    Html(render::bulk_page(&ViewState::new(&state.config, View::Bulk, None)))
}

pub async fn serve_asset(Path(file): Path<String>) -> impl IntoResponse {
    match Asset::get(&file) {
        Some(content) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                Body::from(content.data),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::infrastructure::store::Container;
    use crate::test_support::{TestStore, test_state};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    async fn fetch(store: TestStore, uri: &str) -> (StatusCode, Option<String>, String) {
        let app = crate::app::create_app(test_state(store));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn list_page_renders_selected_year() {
        let store = TestStore::new();
        store
            .insert(
                Container::Releases,
                json!({ "title": "Sinners", "director": "Coogler", "genre": "Horror", "studio": "WB", "releaseDate": "2025-04-18" }),
            )
            .await;
        store
            .insert(
                Container::Releases,
                json!({ "title": "Nosferatu", "director": "Eggers", "genre": "Horror", "studio": "Focus", "releaseDate": "2024-12-25" }),
            )
            .await;

        let (status, _, html) = fetch(store.clone(), "/?year=2025").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Sinners"));
        assert!(!html.contains("Nosferatu"));

        let (_, _, html) = fetch(store, "/?year=2024").await;
        assert!(html.contains("Nosferatu"));
    }

    #[tokio::test]
    async fn list_page_shows_store_errors_inline() {
        let store = TestStore::new();
        store.fail_next();

        let (status, _, html) = fetch(store, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Error: Failed to retrieve releases"));
    }

    #[tokio::test]
    async fn form_and_bulk_pages_render() {
        let (status, _, html) = fetch(TestStore::new(), "/submit").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"releaseForm\""));

        let (status, _, html) = fetch(TestStore::new(), "/admin").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"csvInput\""));
    }

    #[tokio::test]
    async fn serves_embedded_script() {
        let (status, content_type, body) = fetch(TestStore::new(), "/assets/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().contains("javascript"));
        assert!(body.contains("X-Admin-Username"));

        let (status, _, _) = fetch(TestStore::new(), "/assets/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
