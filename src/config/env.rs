use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DocumentStore,
    DatabaseUrl,
    DbMaxConnections,
    CurrentYear,
    StartYear,
    SeedAdminUsername,
    SeedAdminPassword,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DocumentStore => "DOCUMENT_STORE",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::DbMaxConnections => "DB_MAX_CONNECTIONS",
            EnvKey::CurrentYear => "CURRENT_YEAR",
            EnvKey::StartYear => "START_YEAR",
            EnvKey::SeedAdminUsername => "SEED_ADMIN_USERNAME",
            EnvKey::SeedAdminPassword => "SEED_ADMIN_PASSWORD",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Like [`get`], but treats unset and blank values the same way.
pub fn get_optional(key: EnvKey) -> Option<String> {
    get(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
