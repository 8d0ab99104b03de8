use utoipa::OpenApi;
use crate::common::response::ErrorBody;
use crate::modules::release::dto::{BulkSummary, InvalidItem, NewRelease};
use crate::modules::release::model::Release;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::release::handler::create_release,
        crate::modules::release::handler::get_releases,
    ),
    components(
        schemas(Release, NewRelease, BulkSummary, InvalidItem, ErrorBody)
    ),
    tags(
        (name = "Releases", description = "Release tracking")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::modules::admin::service::{PASSWORD_HEADER, USERNAME_HEADER};

/// Admin credentials travel as two plain headers on every write.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_username",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USERNAME_HEADER))),
            );
            components.add_security_scheme(
                "admin_password",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(PASSWORD_HEADER))),
            );
        }
    }
}
