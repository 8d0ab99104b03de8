use crate::common::response::ApiError;
use crate::modules::admin::service::{AdminError, AdminService, PASSWORD_HEADER, USERNAME_HEADER};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        let status = match err {
            AdminError::MissingCredentials | AdminError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AdminError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(err.to_string(), status)
    }
}

/// Requires a matching `X-Admin-Username` / `X-Admin-Password` pair and
/// exposes the caller as an [`AdminIdentity`](crate::modules::admin::model::AdminIdentity)
/// request extension.
pub async fn admin_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = {
        let headers = req.headers();
        AdminService::verify(
            state,
            header_value(headers, USERNAME_HEADER),
            header_value(headers, PASSWORD_HEADER),
        )
        .await?
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
