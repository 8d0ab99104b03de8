use thiserror::Error;
use tracing::{debug, error, warn};

use super::model::AdminIdentity;
use super::repository::AdminRepository;
use crate::infrastructure::store::StoreError;
use crate::state::AppState;

pub const USERNAME_HEADER: &str = "X-Admin-Username";
pub const PASSWORD_HEADER: &str = "X-Admin-Password";

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Unauthorized: admin credentials are required.")]
    MissingCredentials,
    #[error("Unauthorized: invalid admin credentials.")]
    InvalidCredentials,
    #[error("Failed to verify admin credentials: {0}")]
    Store(#[from] StoreError),
}

pub struct AdminService;

impl AdminService {
    /// Succeeds when at least one `admins` row matches both values exactly.
    /// Blank values count as absent.
    pub async fn verify(
        state: AppState,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AdminIdentity, AdminError> {
        let (Some(username), Some(password)) = (
            username.filter(|u| !u.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AdminError::MissingCredentials);
        };

        let rows = AdminRepository::find_matching(state.store.as_ref(), username, password)
            .await
            .map_err(|e| {
                error!("Admin credential query failed: {}", e);
                AdminError::Store(e)
            })?;

        let Some(row) = rows.into_iter().next() else {
            warn!(username, "Rejected admin credentials");
            return Err(AdminError::InvalidCredentials);
        };

        let credential = AdminRepository::parse(row)?;
        debug!(admin_id = %credential.id, "Admin credentials accepted");
        Ok(AdminIdentity {
            username: credential.username,
        })
    }
}
