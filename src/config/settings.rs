use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::config::env::{self, EnvKey};

pub const DEFAULT_CURRENT_YEAR: i32 = 2025;
pub const DEFAULT_START_YEAR: i32 = 2025;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when DOCUMENT_STORE=postgres")]
    Missing(&'static str),
    #[error("unknown DOCUMENT_STORE backend `{0}` (expected `postgres` or `memory`)")]
    UnknownBackend(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Credential row provisioned into the configured store at startup.
#[derive(Clone, Deserialize)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub current_year: i32,
    pub start_year: i32,
    pub seed_admin: Option<SeedAdmin>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let store_backend: StoreBackend = env::get_or(EnvKey::DocumentStore, "postgres").parse()?;
        let database_url = env::get_optional(EnvKey::DatabaseUrl);

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing(EnvKey::DatabaseUrl.as_str()));
        }

        let seed_admin = match (
            env::get_optional(EnvKey::SeedAdminUsername),
            env::get_optional(EnvKey::SeedAdminPassword),
        ) {
            (Some(username), Some(password)) => Some(SeedAdmin { username, password }),
            _ => None,
        };

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            store_backend,
            database_url,
            db_max_connections: env::get_parsed(EnvKey::DbMaxConnections, 10),
            current_year: env::get_parsed(EnvKey::CurrentYear, DEFAULT_CURRENT_YEAR),
            start_year: env::get_parsed(EnvKey::StartYear, DEFAULT_START_YEAR),
            seed_admin,
        })
    }

    /// In-process store with default years and no seed admin.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            server_port: 3000,
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            current_year: DEFAULT_CURRENT_YEAR,
            start_year: DEFAULT_START_YEAR,
            seed_admin: None,
        }
    }
}
