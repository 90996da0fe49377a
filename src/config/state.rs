// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::upload::UploadStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub uploads: UploadStore,
    pub started_at: chrono::DateTime<chrono::Local>,
}

impl AppState {
    /// Build state from configuration, creating the upload directory
    pub fn new(config: Config) -> std::io::Result<Arc<Self>> {
        let uploads = UploadStore::open(&config.upload.dir)?;
        Ok(Arc::new(Self {
            config,
            uploads,
            started_at: chrono::Local::now(),
        }))
    }
}
