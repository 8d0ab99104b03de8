use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
pub mod validator;

pub fn router(state: AppState) -> Router<AppState> {
    // The guard is a route layer on POST only, so other verbs still reach the 405 fallback.
    let create = post(handler::create_release)
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::middleware::admin::admin_guard,
        ))
        .fallback(handler::method_not_allowed);

    Router::new()
        .route("/createrelease", create)
        .route("/getreleases", get(handler::get_releases))
}
