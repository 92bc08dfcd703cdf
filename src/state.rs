use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::object_store::ObjectStore;

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        store: Arc<dyn ObjectStore>,
        config: Config,
    ) -> Self {
        Self {
            db,
            store,
            config: Arc::new(config),
        }
    }
}
