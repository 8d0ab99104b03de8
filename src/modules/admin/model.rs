use serde::{Deserialize, Serialize};

pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

/// One row of the `admins` container as read back after a match. The
/// password column is only ever compared inside the store query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    #[serde(default)]
    pub id: String,
    pub username: String,
}

/// Attached to the request once the admin check has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
}
