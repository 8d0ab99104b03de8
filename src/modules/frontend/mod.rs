//! Browser-facing pages: the public release list, the single-release form
//! and the bulk entry view.

use axum::Router;
use axum::routing::get;
use crate::state::AppState;

pub mod handler;
pub mod render;
pub mod state;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_page))
        .route("/submit", get(handler::form_page))
        .route("/admin", get(handler::bulk_page))
        .route("/assets/{file}", get(handler::serve_asset))
}
