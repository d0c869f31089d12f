use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Repositories;
use crate::upload::UploadStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(config: AppConfig, repos: Repositories) -> Self {
        let uploads = UploadStore::new(&config.uploads);
        Self {
            config: Arc::new(config),
            repos,
            uploads,
        }
    }
}
