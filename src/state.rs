use crate::config::settings::AppConfig;
use crate::infrastructure::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: SharedStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore) -> Self {
        Self { config, store }
    }
}
